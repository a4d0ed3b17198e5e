use wirepack_common::OutputAsset;
use wirepack_error::{BuildError, BuildResult};
use wirepack_fs::FileSystem;

use crate::types::SharedOptions;

/// Renders `index.html` from the configured template with one tag per
/// emitted asset. Skipped entirely when no template is configured.
pub struct HtmlStage<'a, F: FileSystem> {
  fs: &'a F,
  options: &'a SharedOptions,
}

impl<'a, F: FileSystem> HtmlStage<'a, F> {
  pub fn new(fs: &'a F, options: &'a SharedOptions) -> Self {
    Self { fs, options }
  }

  pub fn render(&self, assets: &[OutputAsset]) -> BuildResult<Option<OutputAsset>> {
    let Some(template_path) = &self.options.html_template else {
      return Ok(None);
    };

    let template_path = self.options.resolve_against_cwd(template_path);
    if !self.fs.is_file(&template_path) {
      return Err(BuildError::template(template_path));
    }
    let template = self
      .fs
      .read_to_string(&template_path)
      .map_err(|_| BuildError::template(template_path))?;

    let tags = assets
      .iter()
      .filter_map(|asset| tag_for(&asset.filename))
      .collect::<Vec<_>>()
      .join("\n");

    Ok(Some(OutputAsset {
      filename: "index.html".to_string(),
      content: inject(&template, &tags),
      hash: None,
    }))
  }
}

fn tag_for(filename: &str) -> Option<String> {
  if filename.ends_with(".js") {
    Some(format!(r#"<script defer src="{filename}"></script>"#))
  } else if filename.ends_with(".css") {
    Some(format!(r#"<link rel="stylesheet" href="{filename}">"#))
  } else {
    None
  }
}

/// Tags land just before `</body>`, or `</head>` in body-less templates.
/// A template with neither anchor still works: tags are appended.
fn inject(template: &str, tags: &str) -> String {
  for anchor in ["</body>", "</head>"] {
    if let Some(position) = template.find(anchor) {
      let mut html = String::with_capacity(template.len() + tags.len() + 1);
      html.push_str(&template[..position]);
      html.push_str(tags);
      html.push('\n');
      html.push_str(&template[position..]);
      return html;
    }
  }

  let mut html = template.to_string();
  if !html.ends_with('\n') {
    html.push('\n');
  }
  html.push_str(tags);
  html.push('\n');
  html
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn injects_before_body_close() {
    let html = inject("<html><body><h1>hi</h1></body></html>", r#"<script defer src="main.js"></script>"#);
    assert_eq!(
      html,
      "<html><body><h1>hi</h1><script defer src=\"main.js\"></script>\n</body></html>"
    );
  }

  #[test]
  fn falls_back_to_head_then_append() {
    let html = inject("<html><head></head></html>", "<tag>");
    assert_eq!(html, "<html><head><tag>\n</head></html>");

    let html = inject("plain", "<tag>");
    assert_eq!(html, "plain\n<tag>\n");
  }

  #[test]
  fn css_assets_get_link_tags() {
    assert_eq!(
      tag_for("styles.css").unwrap(),
      r#"<link rel="stylesheet" href="styles.css">"#
    );
    assert!(tag_for("data.json").is_none());
  }
}
