//! the themecap binary
use themecap::app::TcApp;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let Some(app) = TcApp::init().await? else {
        return Ok(());
    };

    if let Err(e) = app.run().await {
        let code = if e.host_left_dirty() { 2 } else { 1 };

        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(code);
    }

    Ok(())
}
