//! Example directory loading tests.

use std::fs;
use std::path::{Path, PathBuf};

use ldif_io::{
    load_example, read_artifact, write_artifact, write_example, ArtifactError, ArtifactNames,
    Field, FloatArray, LoadError, LoaderConfig, MeshId, MeshIdSource, ShapeExample, Verbosity,
};
use tempfile::TempDir;

/// Example whose values encode their field and index.
fn make_example(mesh_id: &str) -> ShapeExample {
    let mut builder = ShapeExample::builder(MeshId::parse(mesh_id).unwrap());
    for (k, field) in Field::NUMERIC.into_iter().enumerate() {
        let array = FloatArray::from_fn(field.shape(), |i| k as f32 * 1000.0 + (i % 997) as f32);
        builder = builder.with_array(field, array);
    }
    builder.build().unwrap()
}

/// Write a complete example directory at `<root>/<category>/<hash>`.
fn write_directory(root: &Path, category: &str, hash: &str) -> (PathBuf, ShapeExample) {
    let dir = root.join(category).join(hash);
    let example = make_example(&format!("{}|{}", category, hash));
    write_example(&dir, &example, &LoaderConfig::default()).unwrap();
    (dir, example)
}

fn artifact(dir: &Path, field: Field) -> PathBuf {
    dir.join(ArtifactNames::default().get(field).unwrap())
}

#[test]
fn test_load_written_directory() {
    let tmp = TempDir::new().unwrap();
    let (dir, example) = write_directory(tmp.path(), "04090263", "22");

    let loaded = load_example(&dir, &LoaderConfig::default()).unwrap();
    assert_eq!(loaded, example);
    assert_eq!(loaded.mesh_id().category(), "04090263");
    assert_eq!(loaded.mesh_id().hash(), "22");
    assert_eq!(loaded.depth_renders().shape(), &[20, 224, 224, 1]);
    assert_eq!(loaded.grid().shape(), &[32, 32, 32]);
}

#[test]
fn test_depth_is_stored_with_capture_axis() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");

    let on_disk = read_artifact(artifact(&dir, Field::DepthRenders)).unwrap();
    assert_eq!(on_disk.shape(), &[1, 20, 224, 224, 1]);
}

#[test]
fn test_every_verbosity_loads_the_same_example() {
    let tmp = TempDir::new().unwrap();
    let (dir, example) = write_directory(tmp.path(), "cat", "h");

    for verbosity in [Verbosity::Quiet, Verbosity::Normal, Verbosity::Verbose] {
        let config = LoaderConfig::new().with_verbosity(verbosity);
        assert_eq!(load_example(&dir, &config).unwrap(), example);
    }
}

#[test]
fn test_small_grid_fails_without_partial_example() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    write_artifact(artifact(&dir, Field::Grid), &FloatArray::zeros(&[16, 16, 16])).unwrap();

    match load_example(&dir, &LoaderConfig::default()) {
        Err(LoadError::ShapeMismatch {
            field,
            expected,
            got,
            ..
        }) => {
            assert_eq!(field, Field::Grid);
            assert_eq!(expected, vec![32, 32, 32]);
            assert_eq!(got, vec![16, 16, 16]);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_shape_is_checked_before_values() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    let path = artifact(&dir, Field::Grid);
    write_artifact(&path, &FloatArray::zeros(&[16, 16, 16])).unwrap();
    // Header and dims only: the values were never written.
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..8 + 3 * 4]).unwrap();

    assert!(matches!(
        load_example(&dir, &LoaderConfig::default()),
        Err(LoadError::ShapeMismatch {
            field: Field::Grid,
            ..
        })
    ));
}

#[test]
fn test_truncated_extra_depth_capture_rejected_by_shape() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    let path = artifact(&dir, Field::DepthRenders);
    write_artifact(&path, &FloatArray::zeros(&[2, 20, 224, 224, 1])).unwrap();
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..64]).unwrap();

    match load_example(&dir, &LoaderConfig::default()) {
        Err(LoadError::SingleViewExpected { got, .. }) => {
            assert_eq!(got, vec![2, 20, 224, 224, 1]);
        }
        other => panic!("expected SingleViewExpected, got {:?}", other),
    }
}

#[test]
fn test_two_depth_captures_rejected() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    write_artifact(
        artifact(&dir, Field::DepthRenders),
        &FloatArray::zeros(&[2, 20, 224, 224, 1]),
    )
    .unwrap();

    match load_example(&dir, &LoaderConfig::default()) {
        Err(LoadError::SingleViewExpected { got, .. }) => {
            assert_eq!(got, vec![2, 20, 224, 224, 1]);
        }
        other => panic!("expected SingleViewExpected, got {:?}", other),
    }
}

#[test]
fn test_depth_without_capture_axis_rejected() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    write_artifact(
        artifact(&dir, Field::DepthRenders),
        &FloatArray::zeros(&[20, 224, 224, 1]),
    )
    .unwrap();

    assert!(matches!(
        load_example(&dir, &LoaderConfig::default()),
        Err(LoadError::SingleViewExpected { .. })
    ));
}

#[test]
fn test_missing_artifact() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    let path = artifact(&dir, Field::SurfacePointSamples);
    fs::remove_file(&path).unwrap();

    match load_example(&dir, &LoaderConfig::default()) {
        Err(LoadError::MissingArtifact { field, path: got }) => {
            assert_eq!(field, Field::SurfacePointSamples);
            assert_eq!(got, path);
        }
        other => panic!("expected MissingArtifact, got {:?}", other),
    }
}

#[test]
fn test_corrupt_artifact() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    fs::write(artifact(&dir, Field::World2Grid), b"NOPE\x01\x00\x02\x00").unwrap();

    match load_example(&dir, &LoaderConfig::default()) {
        Err(LoadError::InvalidArtifact { field, source, .. }) => {
            assert_eq!(field, Field::World2Grid);
            assert!(matches!(source, ArtifactError::InvalidMagic { .. }));
        }
        other => panic!("expected InvalidArtifact, got {:?}", other),
    }
}

#[test]
fn test_truncated_artifact() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_directory(tmp.path(), "cat", "h");
    let path = artifact(&dir, Field::World2Grid);
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 4]).unwrap();

    assert!(matches!(
        load_example(&dir, &LoaderConfig::default()),
        Err(LoadError::InvalidArtifact {
            field: Field::World2Grid,
            source: ArtifactError::Truncated { .. },
            ..
        })
    ));
}

#[test]
fn test_malformed_mesh_id_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("bad|category").join("h");
    let example = make_example("ok|h");
    write_example(&dir, &example, &LoaderConfig::default()).unwrap();

    assert!(matches!(
        load_example(&dir, &LoaderConfig::default()),
        Err(LoadError::MalformedMeshId { .. })
    ));
}

#[test]
fn test_mesh_id_from_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("flat_layout");
    let config = LoaderConfig::new().with_mesh_id_source(MeshIdSource::File("mesh_id.txt".into()));
    let example = make_example("02691156|abc");
    write_example(&dir, &example, &config).unwrap();

    assert_eq!(
        fs::read_to_string(dir.join("mesh_id.txt")).unwrap(),
        "02691156|abc"
    );
    assert_eq!(load_example(&dir, &config).unwrap(), example);
}

#[test]
fn test_custom_artifact_names() {
    let tmp = TempDir::new().unwrap();
    let names = ArtifactNames {
        grid: "coarse_grid.bin".to_owned(),
        ..ArtifactNames::default()
    };
    let config = LoaderConfig::new().with_artifact_names(names);
    let dir = tmp.path().join("cat").join("h");
    let example = make_example("cat|h");
    write_example(&dir, &example, &config).unwrap();

    assert!(dir.join("coarse_grid.bin").is_file());
    assert!(!dir.join("grid.ldta").exists());
    assert_eq!(load_example(&dir, &config).unwrap(), example);
    assert!(matches!(
        load_example(&dir, &LoaderConfig::default()),
        Err(LoadError::MissingArtifact {
            field: Field::Grid,
            ..
        })
    ));
}

#[test]
fn test_world2grid_matrix_survives_loading() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("cat").join("h");
    let mut parts = make_example("cat|h").into_parts();
    parts.world2grid = FloatArray::new(
        vec![4, 4],
        vec![
            16.0, 0.0, 0.0, 16.0, //
            0.0, 16.0, 0.0, 16.0, //
            0.0, 0.0, 16.0, 16.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    )
    .unwrap();
    let example = ShapeExample::try_from(parts).unwrap();
    write_example(&dir, &example, &LoaderConfig::default()).unwrap();

    let loaded = load_example(&dir, &LoaderConfig::default()).unwrap();
    let w2g = loaded.world2grid_matrix();
    let p = w2g.transform_point(ldif_core::Vec3::new(-1.0, 0.0, 1.0));
    assert_eq!(p.as_array(), [0.0, 16.0, 32.0]);
}
