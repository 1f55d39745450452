use crate::error::AppError;
use crate::fs::listing::list_entries;
use crate::fs::tree::{build_tree, FileNode};
use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use std::sync::Arc;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
	<title>Trash Backup</title>
	<style>
		body { margin: 0; font-family: sans-serif; display: flex; height: 100vh; }
		.sidebar { width: 220px; background: #222; color: white; padding: 20px; }
		.main { flex-grow: 1; padding: 20px; overflow-y: auto; }
		.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(140px, 1fr)); gap: 20px; }
		.file-card { background: #f9f9f9; border: 1px solid #ddd; border-radius: 8px; padding: 10px; text-align: center; }
		.file-card a { text-decoration: none; color: #333; font-size: 14px; word-break: break-all; }
		.file-icon { font-size: 32px; margin-bottom: 8px; }
	</style>
	<script>
		const ws = new WebSocket((location.protocol === "https:" ? "wss://" : "ws://") + location.host + "/ws");
		ws.onmessage = function (event) {
			const card = document.createElement("div");
			card.className = "file-card";
			const icon = document.createElement("div");
			icon.className = "file-icon";
			icon.textContent = "📄";
			const link = document.createElement("a");
			link.href = "/files/" + encodeURIComponent(event.data);
			link.target = "_blank";
			link.textContent = event.data;
			card.append(icon, link);
			document.getElementById("grid").appendChild(card);
		};
	</script>
</head>
<body>
	<div class="sidebar">
		<h2>Folders</h2>
		<ul>
			<li>🗑 Trash</li>
			<li>📁 Backup</li>
		</ul>
	</div>
	<div class="main">
		<h1>Backed Up Trash Files</h1>
		<div class="grid" id="grid">
{{entries}}		</div>
	</div>
</body>
</html>
"#;

/// GET / - HTML listing of the backup root
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let backup_dir = state.config.backup_dir.clone();
    let entries = tokio::task::spawn_blocking(move || list_entries(&backup_dir))
        .await
        .map_err(|e| anyhow::anyhow!(e))?
        .map_err(|e| anyhow::anyhow!("Unable to read backup folder: {}", e))?;

    let names: Vec<String> = entries.into_iter().map(|e| e.name).collect();
    Ok(Html(render_index(&names)))
}

/// GET /api/tree - recursive JSON view of the backup root
pub async fn tree(State(state): State<Arc<AppState>>) -> Result<Json<FileNode>, AppError> {
    let backup_dir = state.config.backup_dir.clone();
    let tree = tokio::task::spawn_blocking(move || build_tree(&backup_dir))
        .await
        .map_err(|e| anyhow::anyhow!(e))?
        .map_err(|e| anyhow::anyhow!("Failed to build file tree: {}", e))?;

    Ok(Json(tree))
}

fn render_index(names: &[String]) -> String {
    let cards: String = names
        .iter()
        .map(|name| {
            format!(
                "\t\t\t<div class=\"file-card\">\n\t\t\t\t<div class=\"file-icon\">📄</div>\n\t\t\t\t<a href=\"/files/{}\" target=\"_blank\">{}</a>\n\t\t\t</div>\n",
                escape_html(&encode_path_segment(name)),
                escape_html(name)
            )
        })
        .collect();
    INDEX_TEMPLATE.replace("{{entries}}", &cards)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
