//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The D3.js flow chart lives in `assets/js/flow-chart.js`. It is evaluated at
//! global scope once D3 has loaded and exposed as `window.renderFlowChart`.

use std::time::Duration;
use wasm_bindgen::JsCast;

static FLOW_CHART_JS: &str = include_str!("../assets/js/flow-chart.js");

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('MPFM JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Quote `value` as a JS string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}

/// Initialize chart scripts with a wait-for-D3 polling loop. Call once at startup.
pub fn init_charts() {
    let store_js = format!("window.__mpfmChartScripts = {};", js_string(FLOW_CHART_JS));
    let _ = js_sys::eval(&store_js);

    let init_js = r#"
        (function() {
            var waitForD3 = setInterval(function() {
                if (typeof d3 !== 'undefined') {
                    clearInterval(waitForD3);
                    (0, eval)(window.__mpfmChartScripts);
                    delete window.__mpfmChartScripts;
                    if (typeof renderFlowChart !== 'undefined') window.renderFlowChart = renderFlowChart;
                    if (typeof destroyFlowChart !== 'undefined') window.destroyFlowChart = destroyFlowChart;
                    window.__mpfmChartsReady = true;
                    console.log('MPFM charts initialized');
                }
            }, 100);
        })();
    "#;
    let _ = js_sys::eval(init_js);
}

/// Render the OFR/WFR/GFR lines and GVF/WLR ratios of a flow series.
///
/// Waits until D3, the chart script and the container element all exist.
pub fn render_flow_chart(container_id: &str, data_json: &str, config_json: &str) {
    let container = js_string(container_id);
    let data = js_string(data_json);
    let config = js_string(config_json);
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__mpfmChartsReady &&
                    typeof window.renderFlowChart !== 'undefined' &&
                    document.getElementById({container})) {{
                    clearInterval(poll);
                    try {{
                        window.renderFlowChart({container}, {data}, {config});
                    }} catch(e) {{ console.error('[MPFM] renderFlowChart error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
    ));
}

/// Clear the chart in the given container.
pub fn destroy_chart(container_id: &str) {
    call_js(&format!(
        "var el = document.getElementById({}); if (el) el.innerHTML = '';",
        js_string(container_id)
    ));
}

/// Resolve after `duration` using `setTimeout`.
pub async fn sleep(duration: Duration) {
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let Some(window) = web_sys::window() else {
            let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            return;
        };
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(resolve.unchecked_ref(), millis)
            .is_err()
        {
            let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
