//! Checkpoint and Resume
//!
//! This example snapshots a ledger to disk, simulates a restart, and resumes
//! minting from where the previous process stopped.
//!
//! Key concepts:
//! - JSON checkpoints for readability, binary for compactness
//! - Atomic writes (temp file, then rename)
//! - Restored ledgers continue the id sequence
//!
//! Run with: cargo run --example checkpoint_resume

use arena_ledger::{Attributes, Identity, LedgerBuilder, LedgerCheckpoint, TokenLedger};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint and Resume Example ===\n");

    let dir = std::env::temp_dir().join("arena-ledger-checkpoints");
    fs::create_dir_all(&dir)?;
    let path = dir.join("ledger.json");
    let controller = Identity::new("arena");

    // Run 1: mint a few tokens, then stop
    println!("Run 1: Minting");
    println!("----------------------------------------");
    let mut ledger = LedgerBuilder::new().controller(controller.clone()).build()?;
    for (n, owner) in ["alice", "bob", "carol"].into_iter().enumerate() {
        let level = n as u64 + 1;
        let id = ledger.mint(
            &controller,
            Identity::new(owner),
            format!("ipfs://{owner}"),
            Attributes::new(level * 5, level * 3, level * 2),
        )?;
        println!("  Minted {id} for {owner}");
    }

    let checkpoint = ledger.checkpoint();
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, checkpoint.to_json()?)?;
    fs::rename(&temp, &path)?;
    println!("  [Checkpoint] Saved {} to {}", checkpoint.id, path.display());
    println!("  Binary form would take {} bytes", checkpoint.to_binary()?.len());
    drop(ledger);
    println!("\n  [INTERRUPT] Process stopped.\n");

    // Run 2: resume and keep going
    println!("Run 2: Resuming");
    println!("----------------------------------------");
    let restored = LedgerCheckpoint::from_json(&fs::read_to_string(&path)?)?;
    let mut ledger = TokenLedger::resume(restored)?;
    println!(
        "  Resumed with {} tokens, last id {}",
        ledger.total_supply(),
        ledger.last_issued_id()
    );

    let id = ledger.mint(
        &controller,
        Identity::new("dave"),
        "ipfs://dave",
        Attributes::new(4, 4, 4),
    )?;
    println!("  Minted {id} for dave");
    println!(
        "  {} notification(s) pending since resume",
        ledger.pending_notifications().len()
    );

    fs::remove_dir_all(&dir).ok();

    println!("\nKey Takeaways:");
    println!("- Checkpoints are validated before a ledger is rebuilt");
    println!("- Notifications recorded before the checkpoint count as delivered");
    println!("- Atomic writes prevent checkpoint corruption");

    println!("\n=== Example Complete ===");
    Ok(())
}
