//! An application for inspecting a MINC volume and rewriting it as an
//! unsigned 16-bit volume in standard order.

use minc2_simple::{Dimension, Minc2File, MincType};
use std::env;
use std::time::Instant;

fn print_dimensions(dims: &[Dimension]) {
    for dim in dims {
        print!(
            "Dimension:{} length:{} start:{} step:{}",
            dim.kind.name(),
            dim.length,
            dim.start,
            dim.step
        );
        if dim.irregular {
            print!(" irregular");
        }
        if let Some(c) = dim.direction_cosines {
            print!(" Cosines: {} {} {}", c[0], c[1], c[2]);
        }
        println!();
    }
}

fn print_stats(values: &[f64], start: Instant) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    println!(
        "Avg:{} min:{} max:{} time:{} msec",
        avg,
        min,
        max,
        start.elapsed().as_millis()
    );
}

fn main() {
    let mut args = env::args().skip(1);
    let input = args.next().expect("Path to input MINC file is required");
    let output = args.next().expect("Path to output MINC file is required");

    let mut file = Minc2File::new();
    file.open(&input).expect("Failed to open MINC file");
    let data_type = file.data_type().unwrap();
    println!(
        "File:{} dimensions:{} data type:{} storage type:{}",
        input,
        file.ndim().unwrap(),
        data_type.name(),
        file.storage_data_type().unwrap().name()
    );
    println!("nelement:{}", file.nelement().unwrap());
    println!("File order:");
    print_dimensions(file.store_dimensions().unwrap());

    let mut out = Minc2File::new();
    out.define(file.store_dimensions().unwrap(), MincType::UShort, data_type)
        .expect("Failed to define output volume");
    out.create(&output).expect("Failed to create output file");

    let start = Instant::now();
    let values: Vec<f64> = file.load_complete_volume_vec().expect("Failed to read volume");
    print_stats(&values, start);

    file.setup_standard_order().expect("Failed to set up standard order");
    println!("\nStandard order:");
    print_dimensions(file.representation_dimensions().unwrap());
    let start = Instant::now();
    let values: Vec<f64> = file.load_complete_volume_vec().expect("Failed to read volume");
    print_stats(&values, start);

    out.setup_standard_order().expect("Failed to set up standard order");
    let start = Instant::now();
    out.save_complete_volume(&values).expect("Failed to write volume");
    out.close().expect("Failed to close output file");
    println!(
        "Saved values to {} using standard order time:{} msec",
        output,
        start.elapsed().as_millis()
    );
}
