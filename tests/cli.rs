use std::io::Write;
use std::process::{Command, Stdio};

/// Helper to run the mmcartbox CLI with CSV piped to stdin.
fn run_mmcartbox(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new("cargo")
        .args(["run", "--bin", "mmcartbox", "--"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && &bytes[0..8] == &[137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_end_to_end_local_suggestion() {
    let csv = "Date,Sales,Region\n2024-01-01,120,North\n2024-01-02,150,South\n";
    let stdout = run_mmcartbox(&["compare sales by region"], csv).unwrap();
    let spec: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(spec["type"], "bar");
    assert_eq!(spec["x"], "Sales");
    assert_eq!(spec["y"][0], "Region");
}

#[test]
fn test_end_to_end_keyword_priority() {
    let csv = "x,y\n1,10\n2,20\n";
    let stdout = run_mmcartbox(&["show a line and bar chart"], csv).unwrap();
    let spec: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(spec["type"], "line");
}

#[test]
fn test_end_to_end_header_only_csv_is_no_data() {
    let csv = "Date,Sales\n";
    let stdout = run_mmcartbox(&["line chart of sales"], csv).unwrap();
    let spec: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert!(spec["type"].is_null());
    assert!(spec["x"].is_null());
}

#[test]
fn test_end_to_end_render_sample_to_png() {
    let out = std::env::temp_dir().join("mmcartbox_cli_render_test.png");
    let out_str = out.to_string_lossy().into_owned();
    let result = run_mmcartbox(
        &["sales per region", "--sample", "--out", &out_str],
        "",
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png_bytes = std::fs::read(&out).expect("Failed to read rendered PNG");
    assert!(is_valid_png(&png_bytes), "Output is not a valid PNG");
    let _ = std::fs::remove_file(&out);
}
