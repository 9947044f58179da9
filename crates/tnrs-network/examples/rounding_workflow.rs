//! Compression and Rounding Example
//!
//! This example compresses a dense array into a full-rank tensor train,
//! shrinks it with TT and Tucker rounding, and shows how arithmetic grows
//! ranks that rounding then recovers.
//!
//! Run with:
//! ```bash
//! cargo run --example rounding_workflow
//! ```

use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
use tnrs_network::{RoundingOptions, TensorNetwork};

fn main() -> anyhow::Result<()> {
    println!("{}", "=".repeat(80));
    println!("Tensor Network Compression and Rounding Example");
    println!("{}", "=".repeat(80));
    println!();

    // ========================================================================
    // Example 1: Smooth function sampled on a grid
    // ========================================================================
    println!("Example 1: Rounding a sampled smooth function (4D)");
    println!("{}", "-".repeat(80));

    let shape = vec![12, 12, 12, 12];
    let dense = ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
        let x: f64 = (0..4).map(|k| ix[k] as f64 / 11.0).sum();
        (1.0 + x).recip()
    });
    let mut t = TensorNetwork::from_dense(&dense)?;
    println!("Full-rank TT ranks: {:?}", t.ranks_tt());
    println!("Stored elements:    {}", t.numel());

    for &eps in &[1e-2, 1e-4, 1e-8] {
        let mut rounded = t.clone();
        let start = std::time::Instant::now();
        rounded.round(eps)?;
        let elapsed = start.elapsed();
        println!(
            "  eps {:>6.0e}: TT ranks {:?}, Tucker ranks {:?}, error {:.2e}, {} elements, {:.2}ms",
            eps,
            rounded.ranks_tt(),
            rounded.ranks_tucker(),
            t.relative_error(&rounded)?,
            rounded.numel(),
            elapsed.as_secs_f64() * 1000.0
        );
    }
    println!();

    // ========================================================================
    // Example 2: Rank caps
    // ========================================================================
    println!("Example 2: Fixed rank limits per stage");
    println!("{}", "-".repeat(80));

    let options = RoundingOptions::default()
        .with_tt_rmax(vec![3, 3, 3])
        .with_tucker_rmax(vec![4, 4, 4, 4]);
    t.round_with(&options)?;
    println!("Format:       {}", t.format_name());
    println!("TT ranks:     {:?}", t.ranks_tt());
    println!("Tucker ranks: {:?}", t.ranks_tucker());
    println!();

    // ========================================================================
    // Example 3: Arithmetic grows ranks, rounding recovers them
    // ========================================================================
    println!("Example 3: Arithmetic followed by rounding");
    println!("{}", "-".repeat(80));

    let sum = (&t + &t)?;
    let mut product = (&t * &t)?;
    println!("t + t ranks before rounding: {:?}", sum.ranks_tt());
    println!("t * t ranks before rounding: {:?}", product.ranks_tt());
    product.round(1e-10)?;
    println!("t * t ranks after rounding:  {:?}", product.ranks_tt());
    println!("‖t‖ = {:.6}, ‖t * t‖ = {:.6}", t.norm()?, product.norm()?);

    println!();
    println!("{}", "=".repeat(80));
    Ok(())
}
