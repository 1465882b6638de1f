pub mod app;
pub mod demos;
pub mod renderer;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::OptionExt;
use app::App;
use app::args::{demo_listing, AppArgs};

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = AppArgs::parse();
    if args.list {
        for line in demo_listing() {
            println!("{line}");
        }
        return Ok(());
    }

    let demo = args.demo.ok_or_eyre("No demo selected")?;
    let app = App::new(demo, args.render_config(demo))?;
    app.run()?;

    Ok(())
}
