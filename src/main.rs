// Demo: evaluates the softmax loss on a seeded random problem with both
// strategies and reports how closely they agree.
//
//   cargo run --release -- [config.json]
//
// Without a config file the defaults from `LossConfig::default()` are used.
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use softmax_linear::{grad_check_sparse, softmax_loss, LossConfig, Matrix};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => LossConfig::load_json(&path)?,
        None => LossConfig::default(),
    };
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let x = Matrix::randn_scaled(config.num_examples, config.num_features, 1.0, &mut rng);
    let y: Vec<usize> = (0..config.num_examples)
        .map(|_| rng.gen_range(0..config.num_classes))
        .collect();
    let w = Matrix::randn_scaled(config.num_features, config.num_classes, 1e-3, &mut rng);

    println!(
        "softmax-linear: N={} D={} C={} reg={}",
        config.num_examples, config.num_features, config.num_classes, config.reg
    );
    println!("Expected loss near -ln(1/C) = {:.6}", (config.num_classes as f64).ln());

    let primary = config.strategy;
    let t = Instant::now();
    let main_out = softmax_loss(&w, &x, &y, config.reg, primary)?;
    let main_ms = t.elapsed().as_secs_f64() * 1e3;

    let other = primary.counterpart();
    let t = Instant::now();
    let other_out = softmax_loss(&w, &x, &y, config.reg, other)?;
    let other_ms = t.elapsed().as_secs_f64() * 1e3;

    println!("{primary:?}: loss = {:.6} ({main_ms:.2} ms)", main_out.loss);
    println!("{other:?}: loss = {:.6} ({other_ms:.2} ms)", other_out.loss);
    println!("Loss difference:     {:e}", (main_out.loss - other_out.loss).abs());
    println!("Gradient difference: {:e}", main_out.grad.max_abs_diff(&other_out.grad));

    let loss_at = |w: &Matrix| {
        softmax_loss(w, &x, &y, config.reg, primary).map_or(f64::NAN, |out| out.loss)
    };
    println!("Gradient check ({primary:?}):");
    for s in grad_check_sparse(loss_at, &w, &main_out.grad, 10, 1e-5, &mut rng) {
        println!(
            "  ({:>4}, {:>2}) numerical: {:+.6e} analytic: {:+.6e} relative error: {:.3e}",
            s.row, s.col, s.numerical, s.analytic, s.rel_error
        );
    }

    Ok(())
}
