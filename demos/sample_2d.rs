use poissond::{sample, SamplerConfig};

fn main() {
    let config = SamplerConfig::new(vec![16.0, 16.0], 2.0).with_seed(10).with_sample_cap(10);

    for point in &sample(&config).expect("valid configuration") {
        println!("{}, {}", point[0], point[1]);
    }
}
