//! An application for writing a MINC volume from scratch

use minc2_simple::{AttributeValue, CreateOptions, Dimension, DimensionKind, Minc2File, MincType};
use std::env;

fn main() {
    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to MINC file is required");

    // a 64x64x32 sphere phantom, 1mm isotropic
    let dims = [
        Dimension::new(DimensionKind::X, 64, 1., -32.),
        Dimension::new(DimensionKind::Y, 64, 1., -32.),
        Dimension::new(DimensionKind::Z, 32, 1., -16.),
    ];
    let mut data = Vec::with_capacity(64 * 64 * 32);
    for z in 0..32 {
        for y in 0..64 {
            for x in 0..64 {
                let (dx, dy, dz) = (x as f32 - 31.5, y as f32 - 31.5, z as f32 - 15.5);
                let r = (dx * dx + dy * dy + dz * dz).sqrt();
                data.push(if r < 12. { 100. - r } else { 0. });
            }
        }
    }

    let mut file = Minc2File::new();
    file.define(&dims, MincType::UShort, MincType::Float).unwrap();
    file.create_with_options(&filename, &CreateOptions::new().compression(Some(4)))
        .unwrap();
    file.write_attribute("study", "modality", AttributeValue::Text("phantom".to_string()))
        .unwrap();
    file.save_complete_volume(&data).unwrap();
    file.close().unwrap();
}
