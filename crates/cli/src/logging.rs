use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8) {
	// 0 = errors only (stdout stays clean for decoded output and events)
	// 1 (-v) = info: load/dispose and run summaries
	// 2 (-vv) = debug: every renderer command line
	// 3+ (-vvv) = trace: decoder detail
	let filter = filter_for(verbosity);

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

fn filter_for(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "error",
		1 => "warn,tmdialog=info",
		2 => "debug",
		_ => "trace",
	}
}
