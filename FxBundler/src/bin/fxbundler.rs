fn main() -> anyhow::Result<()> {
    fxbundler::cli::run_cli()
}
