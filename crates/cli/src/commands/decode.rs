use tmdialog_protocol::{PlistDecoder, PlistValue};
use tracing::debug;

use crate::cli::DecodeArgs;
use crate::error::Result;

pub fn execute(args: &DecodeArgs) -> Result<()> {
	let bytes = match &args.file {
		Some(path) => std::fs::read(path)?,
		None => super::read_stdin()?,
	};
	let xml = String::from_utf8_lossy(&bytes);

	let value = decode(&xml, args.max_depth)?;
	let json = render(&value, args.compact)?;
	println!("{json}");
	Ok(())
}

fn decode(xml: &str, max_depth: Option<usize>) -> Result<PlistValue> {
	let mut decoder = PlistDecoder::new();
	if let Some(depth) = max_depth {
		decoder = decoder.with_max_depth(depth);
	}
	debug!(target = "tmdialog", bytes = xml.len(), max_depth = decoder.max_depth(), "decoding plist");
	Ok(decoder.process(xml)?)
}

fn render(value: &PlistValue, compact: bool) -> Result<String> {
	let json = if compact {
		serde_json::to_string(value)?
	} else {
		serde_json::to_string_pretty(value)?
	};
	Ok(json)
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;
	use crate::error::CliError;

	const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>name</key>
	<string>x</string>
	<key>tags</key>
	<array><true/><integer>3</integer></array>
</dict>
</plist>"#;

	#[test]
	fn compact_json_keeps_key_order() {
		let value = decode(DOC, None).unwrap();
		let json = render(&value, true).unwrap();
		assert_eq!(json, r#"{"name":"x","tags":[true,3]}"#);
	}

	#[test]
	fn depth_limit_is_applied() {
		let err = decode(DOC, Some(1)).unwrap_err();
		assert!(matches!(
			err,
			CliError::Protocol(tmdialog_protocol::Error::NestingTooDeep { limit: 1 })
		));
	}

	#[test]
	fn reads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(DOC.as_bytes()).unwrap();

		let args = DecodeArgs {
			file: Some(file.path().to_path_buf()),
			compact: true,
			max_depth: None,
		};
		execute(&args).unwrap();
	}

	#[test]
	fn invalid_utf8_in_file_is_decoded_lossily() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"<plist><string>caf\xE9</string></plist>").unwrap();

		let args = DecodeArgs {
			file: Some(file.path().to_path_buf()),
			compact: true,
			max_depth: None,
		};
		execute(&args).unwrap();

		let bytes = std::fs::read(file.path()).unwrap();
		let value = decode(&String::from_utf8_lossy(&bytes), None).unwrap();
		assert_eq!(value, PlistValue::from("caf\u{FFFD}"));
	}

	#[test]
	fn malformed_input_is_reported() {
		let err = decode("<plist><dict>", None).unwrap_err();
		assert!(err.to_string().starts_with("Malformed plist document"));
	}
}
