//! Arena Battle
//!
//! This example walks a small arena through minting, upgrading and battling
//! tokens, then publishes the resulting notifications to an indexer.
//!
//! Key concepts:
//! - Only the controller mints; only an owner upgrades
//! - Any caller can start a battle, and equal power is a tie
//! - Notifications stay pending until an observer accepts them
//!
//! Run with: cargo run --example arena_battle

use arena_ledger::effects::{publish_pending, DispatchError, EventSink};
use arena_ledger::{Attributes, EventRecord, Identity, LedgerBuilder, LedgerError};

#[derive(Clone)]
struct ConsoleIndexer;

impl EventSink for ConsoleIndexer {
    fn deliver(&self, record: &EventRecord) -> Result<(), DispatchError> {
        println!("  [Indexer] #{} {:?}", record.sequence, record.event);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Arena Battle Example ===\n");

    let arena = Identity::new("arena");
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    let mut ledger = LedgerBuilder::new().controller(arena.clone()).build()?;

    println!("Minting tokens...");
    let knight = ledger.mint(&arena, alice.clone(), "ipfs://knight", Attributes::new(10, 15, 20))?;
    let rogue = ledger.mint(&arena, bob.clone(), "ipfs://rogue", Attributes::new(5, 10, 15))?;
    let mage = ledger.mint(&arena, bob.clone(), "ipfs://mage", Attributes::new(20, 5, 20))?;
    for id in [knight, rogue, mage] {
        println!("  {id}: {} (power {})", ledger.attributes(id)?, ledger.power(id)?);
    }
    println!();

    println!("Bob tries to mint for himself...");
    if let Err(err) = ledger.mint(&bob, bob.clone(), "ipfs://cheat", Attributes::new(99, 99, 99)) {
        println!("  Rejected: {err}\n");
    }

    println!("Bob tries to upgrade Alice's knight...");
    match ledger.upgrade(&bob, knight, Attributes::new(1, 1, 1)) {
        Err(LedgerError::Unauthorized { .. }) => println!("  Rejected: not the owner\n"),
        other => println!("  Unexpected: {other:?}\n"),
    }

    println!("Alice upgrades her knight by (+5, +3, +2)...");
    ledger.upgrade(&alice, knight, Attributes::new(5, 3, 2))?;
    println!(
        "  {knight}: {} with {} experience\n",
        ledger.attributes(knight)?,
        ledger.experience(knight)?
    );

    println!("Battles (started by a spectator)...");
    let spectator = Identity::new("spectator");
    for (a, b) in [(knight, rogue), (rogue, mage), (knight, mage)] {
        let outcome = ledger.battle(&spectator, a, b)?;
        println!("  {a} vs {b}: {outcome}");
    }
    println!();

    println!("Publishing notifications...");
    let report = publish_pending(&mut ledger, &ConsoleIndexer).await?;
    println!(
        "  Delivered {} records, {} still pending",
        report.delivered.len(),
        ledger.pending_notifications().len()
    );
    println!("  Compacted {} delivered records", ledger.compact_history());

    println!("\nKey Takeaways:");
    println!("- Access rules are checked before any state changes");
    println!("- Upgrades add the delta sum to experience; wins add one point");
    println!("- Delivery only advances over records the observer accepted");

    println!("\n=== Example Complete ===");
    Ok(())
}
