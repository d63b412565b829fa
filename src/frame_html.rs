//! Frame response documents
//!
//! Builds the `fc:frame` meta-tag HTML documents returned to frame clients.
//! Every pipeline outcome, success or failure, is one of these documents.

/// Button action kinds supported by frame clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Link,
    Post,
}

impl ButtonAction {
    fn as_str(self) -> &'static str {
        match self {
            ButtonAction::Link => "link",
            ButtonAction::Post => "post",
        }
    }
}

/// One frame button.
#[derive(Debug, Clone)]
pub struct FrameButton {
    pub action: ButtonAction,
    pub label: String,
    pub target: String,
}

impl FrameButton {
    pub fn link(label: &str, target: String) -> Self {
        Self {
            action: ButtonAction::Link,
            label: label.to_string(),
            target,
        }
    }

    pub fn post(label: &str, target: String) -> Self {
        Self {
            action: ButtonAction::Post,
            label: label.to_string(),
            target,
        }
    }
}

/// Frame response document builder.
#[derive(Debug, Clone, Default)]
pub struct FrameHtml {
    pub buttons: Vec<FrameButton>,
    pub image_src: String,
    pub og_title: String,
    pub og_description: String,
    pub post_url: String,
    /// Auxiliary state round-tripped through the client, dev mode only.
    pub state: Option<serde_json::Value>,
}

impl FrameHtml {
    /// Render the meta-tag document.
    pub fn render(&self) -> String {
        let mut meta = String::new();
        meta.push_str("<meta property=\"fc:frame\" content=\"vNext\" />\n");
        meta.push_str(&format!(
            "<meta property=\"fc:frame:image\" content=\"{}\" />\n",
            escape(&self.image_src)
        ));

        for (position, button) in self.buttons.iter().enumerate() {
            let index = position + 1;
            meta.push_str(&format!(
                "<meta property=\"fc:frame:button:{index}\" content=\"{}\" />\n",
                escape(&button.label)
            ));
            meta.push_str(&format!(
                "<meta property=\"fc:frame:button:{index}:action\" content=\"{}\" />\n",
                button.action.as_str()
            ));
            meta.push_str(&format!(
                "<meta property=\"fc:frame:button:{index}:target\" content=\"{}\" />\n",
                escape(&button.target)
            ));
        }

        if !self.post_url.is_empty() {
            meta.push_str(&format!(
                "<meta property=\"fc:frame:post_url\" content=\"{}\" />\n",
                escape(&self.post_url)
            ));
        }

        if let Some(state) = &self.state {
            meta.push_str(&format!(
                "<meta property=\"fc:frame:state\" content=\"{}\" />\n",
                escape(&state.to_string())
            ));
        }

        meta.push_str(&format!(
            "<meta property=\"og:title\" content=\"{}\" />\n",
            escape(&self.og_title)
        ));
        meta.push_str(&format!(
            "<meta property=\"og:description\" content=\"{}\" />\n",
            escape(&self.og_description)
        ));
        meta.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\" />\n",
            escape(&self.image_src)
        ));

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n{meta}</head>\n<body></body>\n</html>\n"
        )
    }
}

/// Error frame with a message rendered into its image.
pub fn error_frame(base_url: &str, message: &str) -> String {
    FrameHtml {
        buttons: Vec::new(),
        image_src: format!("{base_url}/api/og?title={message}&width=600"),
        og_title: "Target Onchain".to_string(),
        og_description: message.to_string(),
        post_url: format!("{base_url}/api/frame"),
        state: None,
    }
    .render()
}

/// The single default response for every validation failure.
pub fn default_error_frame(base_url: &str) -> String {
    error_frame(base_url, "Something went wrong")
}

/// Minimal HTML attribute escaping.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
