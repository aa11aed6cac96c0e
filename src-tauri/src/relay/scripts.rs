//! JavaScript snippets evaluated inside the player page.
//!
//! Every snippet looks elements up explicitly and reports a missing element back
//! to the host instead of throwing inside the page.

use crate::player::PlayerCommand;

pub const PLAYER_CONTAINER_SELECTOR: &str = "#players";
pub const PLAYER_HIDDEN_CLASS: &str = "ng-hide";

pub const PROBE_COMMAND: &str = "relay_probe";
pub const NOTIFICATION_COMMAND: &str = "page_notification";
pub const RELAY_ERROR_MESSAGE: &str = "relayError";

const INVOKE_PRELUDE: &str = "var invoke = function (cmd, args) { \
if (window.__TAURI_INTERNALS__) { return window.__TAURI_INTERNALS__.invoke(cmd, args); } };";

fn js_string(value: &str) -> String {
    // A JSON string literal is a valid JS string literal
    serde_json::Value::String(value.to_string()).to_string()
}

fn control_selectors() -> String {
    let selectors: Vec<String> = PlayerCommand::ALL
        .iter()
        .map(|command| js_string(command.selector()))
        .collect();
    format!("[{}]", selectors.join(", "))
}

/// Reports whether the player container is visible and which controls are missing.
pub fn probe_script(generation: u64) -> String {
    format!(
        r#"(function () {{
  {prelude}
  var player = document.querySelector({container});
  var presence = !player ? "missing" : (player.classList.contains({hidden}) ? "hidden" : "visible");
  var missing = {selectors}.filter(function (selector) {{ return !document.querySelector(selector); }});
  invoke({command}, {{ report: {{ generation: {generation}, player: presence, missingControls: missing }} }});
}})();"#,
        prelude = INVOKE_PRELUDE,
        container = js_string(PLAYER_CONTAINER_SELECTOR),
        hidden = js_string(PLAYER_HIDDEN_CLASS),
        selectors = control_selectors(),
        command = js_string(PROBE_COMMAND),
        generation = generation,
    )
}

/// Attaches one click listener per control, each forwarding its message to the host.
///
/// The page-side generation marker keeps a repeated evaluation from adding listeners twice.
pub fn attach_script(generation: u64) -> String {
    let pairs: Vec<String> = PlayerCommand::ALL
        .iter()
        .map(|command| {
            format!(
                "[{}, {}]",
                js_string(command.selector()),
                js_string(command.message())
            )
        })
        .collect();

    format!(
        r#"(function () {{
  {prelude}
  if (window.__pocketcastsRelayGeneration === {generation}) {{ return; }}
  window.__pocketcastsRelayGeneration = {generation};
  [{pairs}].forEach(function (pair) {{
    var element = document.querySelector(pair[0]);
    if (!element) {{
      invoke({command}, {{ message: {error}, detail: pair[0] }});
      return;
    }}
    element.addEventListener("click", function () {{
      invoke({command}, {{ message: pair[1], detail: null }});
    }});
  }});
}})();"#,
        prelude = INVOKE_PRELUDE,
        generation = generation,
        pairs = pairs.join(", "),
        command = js_string(NOTIFICATION_COMMAND),
        error = js_string(RELAY_ERROR_MESSAGE),
    )
}

/// Clicks the control behind `command` so the page's own handler runs.
pub fn click_script(command: PlayerCommand) -> String {
    format!(
        r#"(function () {{
  {prelude}
  var element = document.querySelector({selector});
  if (element) {{
    element.click();
  }} else {{
    invoke({notify}, {{ message: {error}, detail: {selector} }});
  }}
}})();"#,
        prelude = INVOKE_PRELUDE,
        selector = js_string(command.selector()),
        notify = js_string(NOTIFICATION_COMMAND),
        error = js_string(RELAY_ERROR_MESSAGE),
    )
}
