use nereus::backend::SyntheticBackend;
use nereus::ensemble::{SpatialEnsembleEvaluator, grid_points};
use nereus::quality::assess;

fn main() {
    // Typical clear-water reflectances off the Yellow River mouth
    let s2 = [
        0.021, 0.034, 0.052, 0.047, 0.031, 0.018, 0.012, 0.010, 0.008, 0.004, 0.001, 0.002, 0.001,
    ];
    let s3 = [0.028; 21];
    let (lat, lon) = (37.9, 119.2);

    let evaluator = SpatialEnsembleEvaluator::default();
    let backend = SyntheticBackend::new();

    for p in grid_points(lat, lon) {
        println!("grid point ({:.3}, {:.3})", p.latitude, p.longitude);
    }

    let mean = evaluator.evaluate_averaged(&backend, &s2, &s3, 3.1, 18.0, lat, lon);
    let classification = assess(&mean);

    println!("{}", mean);
    println!("{}", classification.reason);
}
