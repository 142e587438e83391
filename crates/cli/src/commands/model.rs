use tmdialog_protocol::ModelParams;

use crate::cli::ModelArgs;
use crate::error::Result;

pub fn execute(args: &ModelArgs) -> Result<()> {
	println!("{}", render(&args.params, args.escape));
	Ok(())
}

fn render(pairs: &[(String, String)], escape: bool) -> String {
	let params: ModelParams = pairs.iter().cloned().collect();
	if escape {
		params.to_model_escaped()
	} else {
		params.to_model()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
		raw.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn renders_in_argument_order() {
		assert_eq!(
			render(&pairs(&[("title", "Hi"), ("count", "2")]), false),
			r#"{ title = "Hi"; count = "2"; }"#
		);
	}

	#[test]
	fn no_params_renders_empty_model() {
		assert_eq!(render(&[], false), "{ }");
	}

	#[test]
	fn escape_flag_quotes_values() {
		assert_eq!(
			render(&pairs(&[("q", r#"say "hi""#)]), true),
			r#"{ q = "say \"hi\""; }"#
		);
	}
}
