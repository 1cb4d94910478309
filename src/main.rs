use svg2luapath::{Config, Inkscape};

fn main() {
    fn inner() -> Result<(), svg2luapath::Error> {
        let config = Config::from_env();
        let icons = config.resolve_icons(std::env::args().skip(1));
        let converter = Inkscape::new(config.converter.clone());

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        svg2luapath::run(&config, &converter, &icons, &mut out)
    }

    // Logging
    env_logger::init();

    if let Err(e) = inner() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
