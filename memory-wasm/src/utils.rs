use std::io;

use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Buffers one formatted tracing event and hands it to the console on drop.
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            log(line);
        }
    }
}

/// Route `tracing` events from the game core to the browser console.
pub fn init_tracing() {
    // no clock in wasm32-unknown-unknown, so no timestamps
    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(ConsoleWriter::default)
        .try_init();
}

/// Visible size of the page in CSS pixels, scrollbars excluded.
pub fn viewport_size(document: &Document, window: &Window) -> (f64, f64) {
    let client = document
        .document_element()
        .map(|el| (el.client_width(), el.client_height()));
    let inner = (
        window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
        window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
    );
    visible_area(client, inner)
}

/// Prefer the root element's client box; fall back to the window's inner
/// size per axis when the client box is unavailable or collapsed.
pub fn visible_area(client: Option<(i32, i32)>, inner: (f64, f64)) -> (f64, f64) {
    let (cw, ch) = client.unwrap_or((0, 0));
    let w = if cw > 0 { cw as f64 } else { inner.0 };
    let h = if ch > 0 { ch as f64 } else { inner.1 };
    (w, h)
}

/// CSS pixel offset, rounded down so a piece never creeps past its bound.
pub fn px(v: f64) -> String {
    format!("{}px", v.max(0.0).floor())
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

/// Milliseconds per time unit from `?speed=`, clamped to a playable range.
pub fn time_unit_from_query(search: &str) -> Option<u32> {
    let raw = get_query_param(search, "speed")?;
    let ms: u32 = raw.trim().parse().ok()?;
    Some(ms.clamp(50, 5_000))
}

/// UI language from `?lang=`, English unless asked otherwise.
pub fn lang_from_query(search: &str) -> String {
    get_query_param(search, "lang")
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "en".to_string())
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}
