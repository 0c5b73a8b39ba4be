//! Shared fixtures: a scripted stand-in for `upgrade-assistant` installed
//! under a temporary tool home.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Handles both subcommands the way the real tool does, closely enough for
/// the driver: `upgrade` retargets `net6.0` in place (or reports an unknown
/// framework for `foo-bar`); `analyze` writes a JSON report named by
/// `--report` into the working directory.
pub const FAKE_TOOL: &str = r#"#!/bin/sh
cmd="$1"
input="$2"
case "$cmd" in
upgrade)
    fw="$7"
    if [ "$fw" = "foo-bar" ]; then
        echo "Unknown target framework: foo-bar"
        exit 0
    fi
    sleep 1
    sed "s/net6.0/${fw:-net8.0}/" "$input" > "$input.tmp" && mv "$input.tmp" "$input"
    echo "file. $(basename "$input")..."
    echo "  Updating target framework"
    echo "Succeeded"
    ;;
analyze)
    if [ -n "$FAKE_REPORT" ]; then
        printf '%s' "$FAKE_REPORT" > "${11}"
    fi
    echo "Analysis complete"
    ;;
*)
    echo "unknown command $cmd" >&2
    exit 1
    ;;
esac
"#;

pub const ANALYZE_REPORT: &str = r#"{
  "rules": { "UA102": { "label": "Update target framework" } },
  "projects": [{
    "path": "App/App.csproj",
    "ruleInstances": [{
      "projectPath": "App/App.csproj",
      "ruleId": "UA102",
      "location": {
        "path": "App/App.csproj",
        "snippet": "Current: net6.0\nNew: net9.0",
        "links": [{ "url": "https://learn.microsoft.com/dotnet/core/porting" }]
      }
    }, {
      "projectPath": "App/App.csproj",
      "ruleId": "UA209",
      "location": {
        "path": "App/Program.cs",
        "snippet": "using System.Web;\n\nRecommendation:\n\nReplace System.Web"
      }
    }]
  }]
}"#;

/// Installs `script` as `<home>/tools/upgrade-assistant`.
pub fn install_tool(home: &Path, script: &str) -> anyhow::Result<()> {
    let tools = home.join("tools");
    fs::create_dir_all(&tools)?;
    let path = tools.join("upgrade-assistant");
    fs::write(&path, script)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

pub fn write(root: &Path, rel: &str, content: &str) -> anyhow::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn csproj(framework: &str) -> String {
    format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>{framework}</TargetFramework>\n  </PropertyGroup>\n</Project>\n"
    )
}
