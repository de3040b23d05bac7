#[cfg(feature = "nalgebra_affine")]
mod util;

#[cfg(feature = "nalgebra_affine")]
mod nalgebra_affine {
    use super::util::create;
    use approx::assert_abs_diff_eq;
    use minc2_simple::{Dimension, DimensionKind, Minc2File, MincError, MincType};
    use tempfile::tempdir;

    fn oblique() -> Vec<Dimension> {
        let c = std::f64::consts::FRAC_1_SQRT_2;
        vec![
            Dimension::new(DimensionKind::X, 10, 1.5, -7.).with_cosines([c, c, 0.]),
            Dimension::new(DimensionKind::Y, 12, -1., 6.).with_cosines([-c, c, 0.]),
            Dimension::new(DimensionKind::Z, 8, 2., 0.),
        ]
    }

    #[test]
    fn voxel_world_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("oblique.mnc");
        let mut file = create(&path, &oblique(), MincType::Short, MincType::Short);
        file.close().unwrap();

        let mut file = Minc2File::new();
        file.open(&path).unwrap();
        let origin = file.voxel_to_world([0., 0., 0.]).unwrap();
        let c = std::f64::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(origin[0], -7. * c - 6. * c, epsilon = 1e-12);
        assert_abs_diff_eq!(origin[1], -7. * c + 6. * c, epsilon = 1e-12);
        assert_abs_diff_eq!(origin[2], 0.);

        let voxel = [3., 5.5, 2.];
        let world = file.voxel_to_world(voxel).unwrap();
        let back = file.world_to_voxel(world).unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(back[i], voxel[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn singular_transform() {
        let dir = tempdir().unwrap();
        let dims = [
            Dimension::new(DimensionKind::X, 2, 1., 0.).with_cosines([0., 1., 0.]),
            Dimension::new(DimensionKind::Y, 2, 1., 0.),
        ];
        let file = create(&dir.path().join("flat.mnc"), &dims, MincType::Short, MincType::Short);
        assert!(file.voxel_to_world([1., 1., 0.]).is_ok());
        assert!(matches!(
            file.world_to_voxel([0., 0., 0.]),
            Err(MincError::Singular)
        ));
    }
}
