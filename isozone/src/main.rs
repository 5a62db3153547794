use clap::Parser;
use isozone::app::IsozoneCliArguments;

fn main() {
    env_logger::init();
    log::debug!("cwd: {:?}", std::env::current_dir());
    let args = IsozoneCliArguments::parse();
    log::info!("starting isozone at {}", chrono::Local::now().to_rfc3339());
    match args.op.run() {
        Ok(_) => log::info!("finished."),
        Err(e) => {
            log::error!("isozone failed: {e}");
            std::process::exit(1);
        }
    }
}
