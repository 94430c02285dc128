use anyhow::{Context, Result};
use csvplot::canvas::show;
use csvplot::grid::plot_surface;
use csvplot::init_tracing;
use csvplot::surfaceplot::{parse_cli, SurfaceArgs};

fn main() {
    let args = parse_cli();
    init_tracing(args.verbose);
    if args.echo_commands {
        println!("Received arguments: \n");
        println!("{:#?}", args);
        return;
    }
    if let Err(e) = surface(&args) {
        eprintln!("{:#}", e);
        eprintln!("Exiting...");
        std::process::exit(1);
    }
}

fn surface(args: &SurfaceArgs) -> Result<()> {
    plot_surface(&args.filepath, &args.output)
        .with_context(|| format!("could not plot the surface of {}", args.filepath.display()))?;
    if args.display {
        show(&args.output);
    }
    Ok(())
}
