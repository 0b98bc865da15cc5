use tracing_subscriber::EnvFilter;

/// Install a stderr log subscriber.
///
/// `RUST_LOG` applies only when neither `-v` nor `-q` was given.
pub fn init(verbose: u8, quiet: bool) {
	let filter = if quiet {
		EnvFilter::new("error")
	} else {
		match verbose {
			0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
			1 => EnvFilter::new("debug"),
			_ => EnvFilter::new("trace"),
		}
	};

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.try_init();
}
