use inctest::cli;

fn main() -> miette::Result<()> {
    cli::run()
}
