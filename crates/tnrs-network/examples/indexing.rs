//! Indexing Example
//!
//! This example reads entries, slabs and point sets out of a compressed
//! network without materializing it, selects entries with a mask network,
//! and overwrites a sub-box in place.
//!
//! Run with:
//! ```bash
//! cargo run --example indexing
//! ```

use scirs2_core::ndarray_ext::{Array2, ArrayD, IxDyn};
use tnrs_network::{accepted_inputs, weight_mask, Assigned, KeyEntry, SliceSpec, TensorNetwork};

fn main() -> anyhow::Result<()> {
    println!("{}", "=".repeat(80));
    println!("Tensor Network Indexing Example");
    println!("{}", "=".repeat(80));
    println!();

    let shape = vec![8, 8, 8, 8, 8];
    let dense = ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
        (0..5).map(|k| (ix[k] as f64 + 1.0).ln()).sum::<f64>()
    });
    let mut t = TensorNetwork::from_dense(&dense)?;
    t.round(1e-10)?;
    println!("Network: {}", t);
    println!();

    // ========================================================================
    // Example 1: Basic keys
    // ========================================================================
    println!("Example 1: Integers, slices, new axes and ellipsis");
    println!("{}", "-".repeat(80));

    let key: Vec<KeyEntry> = vec![1.into(), 2.into(), 3.into(), 4.into(), (-1).into()];
    if let Some(value) = t.index(&key)?.into_scalar() {
        println!("t[1, 2, 3, 4, -1] = {:.6} (dense {:.6})", value, dense[[1, 2, 3, 4, 7]]);
    }

    let key = vec![
        KeyEntry::Slice(SliceSpec::new(None, None, 2)),
        KeyEntry::NewAxis,
        KeyEntry::Ellipsis,
        0.into(),
    ];
    if let Some(sub) = t.index(&key)?.into_network() {
        println!("t[::2, None, ..., 0] has shape {:?}", sub.shape());
    }
    println!();

    // ========================================================================
    // Example 2: Point evaluation
    // ========================================================================
    println!("Example 2: Evaluating many multi-indices at once");
    println!("{}", "-".repeat(80));

    let points = Array2::from_shape_fn((6, 5), |(p, k)| (p * (k + 1)) % 8);
    if let Some(values) = t.index_points(&points)?.into_network() {
        let values = values.materialize()?;
        for (p, value) in values.iter().enumerate() {
            println!("  point {:?} -> {:.6}", points.row(p).to_vec(), value);
        }
    }
    println!();

    // ========================================================================
    // Example 3: Automata and masks
    // ========================================================================
    println!("Example 3: Strings accepted by a weight mask");
    println!("{}", "-".repeat(80));

    let mask = weight_mask::<f64>(5, &[4], 2)?;
    let strings = accepted_inputs(&mask)?;
    println!("Binary strings of length 5 with four ones: {}", strings.nrows());
    for row in strings.outer_iter() {
        println!("  {:?}", row.to_vec());
    }
    println!();

    // ========================================================================
    // Example 4: Assignment
    // ========================================================================
    println!("Example 4: Overwriting a sub-box");
    println!("{}", "-".repeat(80));

    let before = t.ranks_tt();
    t.assign(&[KeyEntry::Ellipsis, (0..4).into()], Assigned::Scalar(0.0))?;
    println!("Ranks before assignment: {:?}", before);
    println!("Ranks after assignment:  {:?}", t.ranks_tt());
    t.round(1e-10)?;
    println!("Ranks after rounding:    {:?}", t.ranks_tt());
    println!("Sum of remaining entries: {:.6}", t.sum()?);

    println!();
    println!("{}", "=".repeat(80));
    Ok(())
}
