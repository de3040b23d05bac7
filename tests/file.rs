mod util;

use minc2_simple::{CreateOptions, Dimension, DimensionKind, Minc2File, MincError, MincType, Scaling};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use util::{create, write_raw, xyz};

#[test]
fn uint8_valid_range_is_type_range() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("u8.mnc");
    let mut file = create(&path, &xyz([2, 2, 2]), MincType::UByte, MincType::Float);
    assert_eq!(file.valid_range().unwrap(), (0., 255.));
    file.close().unwrap();

    let mut file = Minc2File::new();
    file.open(&path).unwrap();
    assert_eq!(file.valid_range().unwrap(), (0., 255.));
    assert_eq!(file.storage_data_type().unwrap(), MincType::UByte);
}

#[test]
fn unrecognized_axis_fails_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("odd.mnc");
    write_raw(&path, &[("zspace", 2), ("wspace", 3), ("xspace", 4)]);

    let mut file = Minc2File::new();
    match file.open(&path) {
        Err(MincError::UnsupportedDimension(name)) => assert_eq!(name, "wspace"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(matches!(file.ndim(), Err(MincError::NotInitialized)));
    assert!(matches!(file.nelement(), Err(MincError::NotInitialized)));

    // the handle stays usable
    let good = dir.path().join("good.mnc");
    write_raw(&good, &[("zspace", 2), ("yspace", 3), ("xspace", 4)]);
    file.open(&good).unwrap();
    assert_eq!(file.ndim().unwrap(), 3);
}

#[test]
fn vector_and_time_fail_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vt.mnc");
    write_raw(&path, &[("time", 2), ("xspace", 3), ("vector_dimension", 3)]);
    let mut file = Minc2File::new();
    assert!(matches!(file.open(&path), Err(MincError::VectorAndTime)));
    assert!(file.ndim().is_err());

    let path = dir.path().join("nospace.mnc");
    write_raw(&path, &[("time", 2), ("vector_dimension", 3)]);
    assert!(file.open(&path).is_err());
}

#[test]
fn nelement_in_both_orders() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("count.mnc");
    let mut file = create(&path, &xyz([4, 5, 6]), MincType::Short, MincType::Short);
    assert_eq!(file.ndim().unwrap(), 3);
    assert_eq!(file.nelement().unwrap(), 120);
    file.setup_standard_order().unwrap();
    assert_eq!(file.nelement().unwrap(), 120);
    file.close().unwrap();

    file.open(&path).unwrap();
    assert_eq!(file.nelement().unwrap(), 120);
    file.setup_standard_order().unwrap();
    assert_eq!(file.nelement().unwrap(), 120);
}

#[test]
fn open_reports_types_and_scaling() {
    let dir = tempdir().unwrap();

    let scaled = dir.path().join("scaled.mnc");
    let mut file = create(&scaled, &xyz([2, 2, 1]), MincType::Short, MincType::Double);
    assert_eq!(file.scaling().unwrap(), Scaling::Global);
    file.save_complete_volume(&[0.25f64, -1., 3.5, 2.]).unwrap();
    file.close().unwrap();
    file.open(&scaled).unwrap();
    assert_eq!(file.scaling().unwrap(), Scaling::Global);
    assert_eq!(file.storage_data_type().unwrap(), MincType::Short);
    assert_eq!(file.data_type().unwrap(), MincType::Float);
    assert_eq!(file.volume_range().unwrap(), (-1., 3.5));
    file.close().unwrap();

    let direct = dir.path().join("direct.mnc");
    let mut file = create(&direct, &xyz([2, 2, 1]), MincType::Int, MincType::UByte);
    assert_eq!(file.scaling().unwrap(), Scaling::Direct);
    file.close().unwrap();
    file.open(&direct).unwrap();
    assert_eq!(file.scaling().unwrap(), Scaling::Direct);
    assert_eq!(file.data_type().unwrap(), MincType::Int);

    file.close().unwrap();
    let sliced = dir.path().join("sliced.mnc");
    file.define(&xyz([2, 2, 2]), MincType::Double, MincType::Double).unwrap();
    file.set_scaling(false, true).unwrap();
    file.create(&sliced).unwrap();
    file.close().unwrap();
    file.open(&sliced).unwrap();
    assert_eq!(file.scaling().unwrap(), Scaling::Slice);
    assert_eq!(file.data_type().unwrap(), MincType::Double);
}

#[test]
fn lifecycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("life.mnc");
    let mut file = create(&path, &xyz([2, 2, 2]), MincType::Float, MincType::Float);

    assert!(matches!(
        file.define(&xyz([2, 2, 2]), MincType::Float, MincType::Float),
        Err(MincError::AlreadyOpen)
    ));
    assert!(matches!(file.open(&path), Err(MincError::AlreadyOpen)));
    assert!(matches!(file.set_scaling(true, false), Err(MincError::AlreadyOpen)));

    file.close().unwrap();
    assert!(file.ndim().is_err());
    file.close().unwrap();

    // opened volumes are read only
    file.open(&path).unwrap();
    assert!(file.save_complete_volume(&[0f32; 8]).is_err());
}

#[test]
fn sentinel_ends_definition() {
    let dir = tempdir().unwrap();
    let mut dims = xyz([3, 4, 5]);
    dims.insert(2, Dimension::END);
    let file = create(&dir.path().join("two.mnc"), &dims, MincType::Short, MincType::Short);
    assert_eq!(file.ndim().unwrap(), 2);
    assert_eq!(file.nelement().unwrap(), 12);
    let kinds: Vec<DimensionKind> = file
        .store_dimensions()
        .unwrap()
        .iter()
        .map(|d| d.kind)
        .collect();
    assert_eq!(kinds, vec![DimensionKind::X, DimensionKind::Y]);
}

#[test]
fn creation_options() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("opts.mnc");
    let mut file = Minc2File::new();
    file.define(&xyz([2, 3, 4]), MincType::UShort, MincType::UShort).unwrap();
    file.create_with_options(&path, &CreateOptions::new().compression(Some(4)))
        .unwrap();
    let values: Vec<u16> = (0..24).collect();
    file.save_complete_volume(&values).unwrap();
    file.close().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

    file.open(&path).unwrap();
    assert_eq!(file.load_complete_volume_vec::<u16>().unwrap(), values);
    file.close().unwrap();

    file.define(&xyz([2, 3, 4]), MincType::UShort, MincType::UShort).unwrap();
    assert!(matches!(
        file.create_with_options(&path, &CreateOptions::new().overwrite(false)),
        Err(MincError::Engine(_))
    ));
}
