use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn rules_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("rules"));
	cmd.env("NO_COLOR", "1").env_remove("RULES_DEFAULT_FORMAT");
	cmd
}

#[allow(dead_code)]
pub fn write_rule(root: &Path, relative_path: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative_path);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}
