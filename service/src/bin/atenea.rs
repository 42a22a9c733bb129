//! `atenea` binary entry point

fn main() -> anyhow::Result<()> {
    atenea_service::cli::run()
}
