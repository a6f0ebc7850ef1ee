#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = quiz_sweep::run_worker().await {
        eprintln!("quiz-sweep-worker fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
