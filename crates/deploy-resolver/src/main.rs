#[tokio::main]
async fn main() -> std::process::ExitCode {
    deploy_resolver::start(std::env::args()).await
}
