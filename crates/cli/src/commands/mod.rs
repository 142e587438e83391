mod convert;
mod decode;
mod model;
mod show;

use std::io::{Read, Write};

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Decode(args) => decode::execute(&args),
		Commands::Model(args) => model::execute(&args),
		Commands::Show(args) => show::execute(args).await,
		Commands::Rtf2txt => convert::rtf_to_text().await,
		Commands::Txt2rtf => convert::text_to_rtf().await,
	}
}

fn read_stdin() -> Result<Vec<u8>> {
	let mut buf = Vec::new();
	std::io::stdin().lock().read_to_end(&mut buf)?;
	Ok(buf)
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
	let mut out = std::io::stdout().lock();
	out.write_all(bytes)?;
	out.flush()?;
	Ok(())
}
