use clap::Parser;

#[derive(Parser)]
#[command(name = "sdlaunch")]
#[command(about = "Create dummy process and assign it to a transient systemd service")]
#[command(
    long_about = "Starts `/bin/sleep <n>` as a transient service through the systemd \
    D-Bus API, reports its main PID every few seconds and stops the unit once the \
    process has exited."
)]
struct Args {
    /// Number of seconds for /bin/sleep
    #[arg(long, default_value_t = 0)]
    sleep: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cmd = sdlaunch::sleep_command(args.sleep);

    match sdlaunch::launch(&cmd).await {
        Ok(outcome) => {
            log::info!(
                "{} finished: status={} result={}",
                outcome.unit_name,
                outcome.exec_main_status,
                outcome.result
            );
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            Err(e.into())
        }
    }
}
