//! C-compatible FFI API for cross-language bindings.
//!
//! Every entry point takes the persisted report JSON (see
//! [`ReportDocument::from_json`]); image references inside it must be base64
//! data URIs or paths relative to the process working directory.
//!
//! # ABI Contract
//!
//! All exported functions use `extern "C"` calling convention and `#[no_mangle]`
//! to ensure stable symbol names.
//!
//! ## Memory management
//! - Buffers returned by `drpt_*` functions are allocated on the Rust heap.
//! - Callers **must** free them with `drpt_free_buffer` / `drpt_free_string`.
//! - Passing a null pointer to a free function is a no-op.
//!
//! ## Error handling
//! - Functions return a `c_int`: 0 = success, 1 = null argument, 2 = invalid
//!   input, 3 = measurement, 4 = encoding, 5 = serialization, 6 = I/O.
//! - Error details can be retrieved via `drpt_last_error`.
//!
//! ## Thread safety
//! - `drpt_last_error` uses a thread-local, so it is safe to call from
//!   multiple threads. Renders themselves share no state.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr;
use std::slice;

use crate::error::ReportError;
use crate::layout_config::LayoutConfig;
use crate::model::ReportDocument;
use crate::pipeline::{compute_layout_config, estimate_page_count, render_to_pdf, PipelineConfig};
use crate::render::render_pdf;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn fail(err: &ReportError) -> c_int {
    set_last_error(&err.to_string());
    err.code()
}

/// # Safety
/// `json_ptr` must point to `json_len` valid bytes.
unsafe fn document_from_raw(json_ptr: *const u8, json_len: u32) -> Result<ReportDocument, ReportError> {
    let bytes = slice::from_raw_parts(json_ptr, json_len as usize);
    let json = std::str::from_utf8(bytes)
        .map_err(|e| ReportError::InvalidInput(format!("invalid UTF-8: {e}")))?;
    ReportDocument::from_json(json, Path::new("."))
}

/// Hand a byte vector to the caller.
///
/// # Safety
/// `out_buf` and `out_len` must be valid pointers.
unsafe fn export_buffer(bytes: Vec<u8>, out_buf: *mut *mut u8, out_len: *mut u32) {
    let len = bytes.len() as u32;
    let buf = bytes.into_boxed_slice();
    *out_buf = Box::into_raw(buf) as *mut u8;
    *out_len = len;
}

// ---------------------------------------------------------------------------
// Core API
// ---------------------------------------------------------------------------

/// Estimate how many pages the report would render to.
///
/// # Safety
/// - `json_ptr` must point to `json_len` valid bytes.
/// - `out_pages` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn drpt_estimate_pages(
    json_ptr: *const u8,
    json_len: u32,
    out_pages: *mut u32,
) -> c_int {
    if json_ptr.is_null() || out_pages.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }
    match document_from_raw(json_ptr, json_len) {
        Ok(doc) => {
            *out_pages = estimate_page_count(&doc) as u32;
            0
        }
        Err(e) => fail(&e),
    }
}

/// Render the report to PDF.
///
/// # Parameters
/// - `json_ptr`, `json_len`: the report JSON
/// - `out_buf`, `out_len`: PDF output (free with `drpt_free_buffer`)
/// - `out_file_name`: generated file name (free with `drpt_free_string`);
///   may be null if the caller does not need it
/// - `out_pages`: page count; may be null
///
/// # Safety
/// - `json_ptr` must point to `json_len` valid bytes.
/// - `out_buf` and `out_len` must be valid pointers; the optional outputs
///   must be valid or null.
#[no_mangle]
pub unsafe extern "C" fn drpt_render_pdf(
    json_ptr: *const u8,
    json_len: u32,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
    out_file_name: *mut *mut c_char,
    out_pages: *mut u32,
) -> c_int {
    if json_ptr.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }

    let report = match document_from_raw(json_ptr, json_len)
        .and_then(|doc| render_to_pdf(&doc, &PipelineConfig::default()))
    {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    let file_name = match CString::new(report.file_name) {
        Ok(cs) => cs,
        Err(_) => {
            return fail(&ReportError::InvalidInput(
                "file name contains a null byte".to_string(),
            ))
        }
    };
    if !out_file_name.is_null() {
        *out_file_name = file_name.into_raw();
    }
    if !out_pages.is_null() {
        *out_pages = report.page_count as u32;
    }
    export_buffer(report.bytes, out_buf, out_len);
    0
}

/// Compute the finalized layout (no PDF rendering). Returns JSON.
///
/// # Safety
/// - `json_ptr` must point to `json_len` valid bytes.
/// - `*out_json_ptr` must be freed with `drpt_free_string`.
#[no_mangle]
pub unsafe extern "C" fn drpt_compute_layout(
    json_ptr: *const u8,
    json_len: u32,
    out_json_ptr: *mut *mut c_char,
) -> c_int {
    if json_ptr.is_null() || out_json_ptr.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }

    let json = match document_from_raw(json_ptr, json_len)
        .and_then(|doc| compute_layout_config(&doc, &PipelineConfig::default()))
        .and_then(|layout| layout.to_json())
    {
        Ok(j) => j,
        Err(e) => return fail(&e),
    };

    match CString::new(json) {
        Ok(cs) => {
            *out_json_ptr = cs.into_raw();
            0
        }
        Err(_) => fail(&ReportError::Serialization(
            "JSON contained null byte".to_string(),
        )),
    }
}

/// Render a PDF from a layout JSON string produced by `drpt_compute_layout`.
///
/// # Safety
/// - `json_ptr` must be a valid null-terminated string.
/// - `out_buf` and `out_len` must be valid pointers.
#[no_mangle]
pub unsafe extern "C" fn drpt_render_from_layout(
    json_ptr: *const c_char,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if json_ptr.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }

    let json = match CStr::from_ptr(json_ptr).to_str() {
        Ok(s) => s,
        Err(e) => {
            return fail(&ReportError::InvalidInput(format!(
                "invalid UTF-8 in JSON: {e}"
            )))
        }
    };

    match LayoutConfig::from_json(json).and_then(|layout| render_pdf(&layout)) {
        Ok(bytes) => {
            export_buffer(bytes, out_buf, out_len);
            0
        }
        Err(e) => fail(&e),
    }
}

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a PDF buffer returned by `drpt_render_pdf` or `drpt_render_from_layout`.
///
/// # Safety
/// `buf` must have been returned by one of those calls and `len` must be the
/// corresponding length.
#[no_mangle]
pub unsafe extern "C" fn drpt_free_buffer(buf: *mut u8, len: u32) {
    if !buf.is_null() {
        let _ = Box::from_raw(slice::from_raw_parts_mut(buf, len as usize));
    }
}

/// Free a string returned by `drpt_render_pdf` or `drpt_compute_layout`.
///
/// # Safety
/// `s` must have been returned by Rust's `CString::into_raw`.
#[no_mangle]
pub unsafe extern "C" fn drpt_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Retrieve the last error message, or null if none occurred.
///
/// The returned pointer is valid until the next `drpt_*` call on the same
/// thread and must **not** be freed.
#[no_mangle]
pub extern "C" fn drpt_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        match borrow.as_ref() {
            Some(cs) => cs.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Return the library version as a null-terminated string.
/// The caller must **not** free this pointer.
#[no_mangle]
pub extern "C" fn drpt_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
