use anyhow::{Context, Result};
use csvplot::canvas::{Canvas, PlottersRenderer};
use csvplot::driver::run;
use csvplot::init_tracing;
use csvplot::plot::{parse_cli, PlotArgs};
use tracing::info;

fn main() {
    let args = parse_cli();
    init_tracing(args.verbose);
    if args.echo_commands {
        println!("Received arguments: \n");
        println!("{:#?}", args);
        return;
    }
    if let Err(e) = plot(args) {
        eprintln!("{:#}", e);
        eprintln!("Exiting...");
        std::process::exit(1);
    }
}

fn plot(args: PlotArgs) -> Result<()> {
    let request = args.into_request().context("invalid arguments")?;
    let mut canvas = Canvas::new(PlottersRenderer::default());
    let written = run(&request, &mut canvas).context("could not plot")?;
    info!("wrote {} chart(s)", written.len());
    Ok(())
}
