#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = quiz_sweep::run().await {
        eprintln!("quiz-sweep fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
