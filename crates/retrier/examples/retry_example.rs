//! Example: retrying a flaky call with a `RetryPolicy`
//!
//! This example demonstrates:
//! 1. Eventual success after transient failures
//! 2. Stopping early on a terminal failure
//! 3. Cancelling a run that would otherwise keep backing off
//!
//! Run with:
//! ```bash
//! RUST_LOG=retrier=debug cargo run -p retrier --example retry_example
//! ```

use retrier::prelude::*;
use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, Failure<std::io::Error>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if attempt <= self.fail_count {
            println!("  Attempt {attempt}: FAILED (simulating transient error)");
            Err(Failure::retryable(std::io::Error::other(format!(
                "Transient error on attempt {attempt}"
            ))))
        } else {
            println!("  Attempt {attempt}: SUCCESS");
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: transient failures, then success
async fn example_eventual_success() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Eventual Success ===\n");

    let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_secs(1));
    let api = UnreliableApi::new(2);

    let start = Instant::now();
    let result = policy.run(|| api.call()).await?;

    println!("\nResult: {result}");
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}

/// Example 2: a 404 is not worth retrying
async fn example_terminal_failure() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Terminal Failure ===\n");

    let policy = RetryPolicy::default();
    let attempts = AtomicU32::new(0);

    let result: Result<(), String> = policy
        .run(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(mark_terminal("Non-retryable HTTP status: 404".to_string())) }
        })
        .await;

    println!("Result: {result:?}");
    println!("Total attempts: {}", attempts.load(Ordering::SeqCst));

    Ok(())
}

/// Example 3: give up when the caller's deadline passes
async fn example_cancellation() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Cancellation ===\n");

    let policy = RetryPolicy::new(100, Duration::from_millis(50), Duration::from_millis(50));
    let cancel = CancellationToken::new();

    let deadline = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        deadline.cancel();
    });

    let start = Instant::now();
    let attempts = AtomicU32::new(0);
    let result: Result<(), &str> = policy
        .run_cancellable(&cancel, |_token| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Failure::retryable("service unavailable")) }
        })
        .await;

    println!("Result: {result:?}");
    println!(
        "Stopped after {} attempts in {:?}",
        attempts.load(Ordering::SeqCst),
        start.elapsed()
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   Retrier: Retry Policy Examples");
    println!("==============================================");

    example_eventual_success().await?;
    example_terminal_failure().await?;
    example_cancellation().await?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
