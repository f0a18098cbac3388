#![forbid(unsafe_code)]

//! # physlab
//!
//! Interactive physics simulations in the terminal.
//!
//! ```bash
//! physlab --tab pendulum --set length=2 --autostart
//! physlab --headless --tab orbit --ticks 1000 --svg orbit.svg
//! ```

use anyhow::Context;
use physlab::Viewport;
use physlab_term::{App, Cli, Config, Program, headless, logging};
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let sink = logging::Sink::choose(cli.log_file.as_deref(), cli.headless);
    logging::init(cli.verbose, sink).context("failed to set up logging")?;

    let config = Config::from_cli(&cli).context("invalid configuration")?;
    debug!("resolved configuration:\n{}", config.to_diagnostic_string());

    let mut app = App::new(&config).context("failed to build simulations")?;

    if cli.headless {
        let report = headless::run(&mut app, cli.ticks);
        print!("{}", report.to_text());
        if let Some(path) = &cli.svg {
            headless::write_svg(&app, path, Viewport::new(cli.width.max(1), cli.height.max(1)))
                .context("failed to write frame")?;
        }
        return Ok(());
    }

    info!(tab = %config.tab, fps = config.fps, "starting interactive session");
    Program::new(app, config.fps)
        .run()
        .context("terminal session failed")?;
    Ok(())
}
