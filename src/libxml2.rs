//! LibXML2 FFI Wrapper Module
//!
//! Safe wrapper around the small part of libxml2 needed to check rendered
//! sitemaps against an XML Schema: parsing a schema from memory, parsing a
//! document from memory, and validating the document with a structured error
//! callback that collects every message.
//!
//! ## Thread Safety
//!
//! - **Initialization** runs once per process behind a `std::sync::Once`.
//! - **Schema parsing** is not thread-safe in libxml2 and is serialized through
//!   a process-wide lock.
//! - **Validation** is thread-safe for distinct documents; every call creates
//!   its own validation context and shares the parsed schema read-only.

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, Once};

use libc::{c_char, c_int, c_void};

use crate::error::{LibXml2Error, LibXml2Result};

static LIBXML2_INIT: Once = Once::new();

/// Serializes `xmlSchemaParse`, which mutates global parser state
static SCHEMA_PARSE_LOCK: Mutex<()> = Mutex::new(());

/// Refuse network access while parsing documents
const XML_PARSE_NONET: c_int = 1 << 11;

// Opaque libxml2 structures
#[repr(C)]
pub struct XmlSchema {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaParserCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaValidCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlDoc {
    _private: [u8; 0],
}

#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    pub fn xmlInitParser();
    pub fn xmlInitGlobals();

    // Schema parsing
    pub fn xmlSchemaNewMemParserCtxt(
        buffer: *const c_char,
        size: c_int,
    ) -> *mut XmlSchemaParserCtxt;
    pub fn xmlSchemaParse(ctxt: *const XmlSchemaParserCtxt) -> *mut XmlSchema;
    pub fn xmlSchemaFreeParserCtxt(ctxt: *mut XmlSchemaParserCtxt);
    pub fn xmlSchemaFree(schema: *mut XmlSchema);

    // Documents
    pub fn xmlReadMemory(
        buffer: *const c_char,
        size: c_int,
        url: *const c_char,
        encoding: *const c_char,
        options: c_int,
    ) -> *mut XmlDoc;
    pub fn xmlFreeDoc(doc: *mut XmlDoc);

    // Validation
    pub fn xmlSchemaNewValidCtxt(schema: *const XmlSchema) -> *mut XmlSchemaValidCtxt;
    pub fn xmlSchemaFreeValidCtxt(ctxt: *mut XmlSchemaValidCtxt);
    pub fn xmlSchemaValidateDoc(ctxt: *mut XmlSchemaValidCtxt, doc: *mut XmlDoc) -> c_int;
    pub fn xmlSchemaSetValidStructuredErrors(
        ctxt: *mut XmlSchemaValidCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
}

#[repr(C)]
#[allow(non_camel_case_types)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *const c_char,
    pub level: c_int,
    pub file: *const c_char,
    pub line: c_int,
    pub str1: *const c_char,
    pub str2: *const c_char,
    pub str3: *const c_char,
    pub int1: c_int,
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

pub type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *mut xmlError)>;

/// Collects validation messages, prefixed with their line when known
unsafe extern "C" fn collect_error(user_data: *mut c_void, error: *mut xmlError) {
    if user_data.is_null() || error.is_null() {
        return;
    }
    let errors = unsafe { &mut *(user_data as *mut Vec<String>) };
    let (message, line) = unsafe { ((*error).message, (*error).line) };
    if message.is_null() {
        return;
    }

    let text = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    let text = text.trim();
    if line > 0 {
        errors.push(format!("line {}: {}", line, text));
    } else {
        errors.push(text.to_string());
    }
}

/// Reference-counted handle to a parsed schema, freed with the last clone
#[derive(Debug, Clone)]
pub struct XmlSchemaPtr {
    inner: Arc<XmlSchemaInner>,
}

#[derive(Debug)]
struct XmlSchemaInner {
    ptr: *mut XmlSchema,
    _phantom: PhantomData<XmlSchema>,
}

// Safety: parsed schemas are read-only during validation
unsafe impl Send for XmlSchemaInner {}
unsafe impl Sync for XmlSchemaInner {}

impl XmlSchemaPtr {
    /// # Safety
    ///
    /// `ptr` must come from `xmlSchemaParse` and must not be freed elsewhere.
    unsafe fn from_raw(ptr: *mut XmlSchema) -> LibXml2Result<Self> {
        if ptr.is_null() {
            return Err(LibXml2Error::SchemaParseFailed);
        }

        Ok(XmlSchemaPtr {
            inner: Arc::new(XmlSchemaInner {
                ptr,
                _phantom: PhantomData,
            }),
        })
    }

    fn as_ptr(&self) -> *const XmlSchema {
        self.inner.ptr
    }
}

impl Drop for XmlSchemaInner {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                xmlSchemaFree(self.ptr);
            }
            self.ptr = std::ptr::null_mut();
        }
    }
}

/// Owned parsed document, freed on drop
struct XmlDocGuard(*mut XmlDoc);

impl Drop for XmlDocGuard {
    fn drop(&mut self) {
        unsafe { xmlFreeDoc(self.0) }
    }
}

/// Owned validation context, freed on drop
struct ValidCtxtGuard(*mut XmlSchemaValidCtxt);

impl Drop for ValidCtxtGuard {
    fn drop(&mut self) {
        unsafe { xmlSchemaFreeValidCtxt(self.0) }
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Return code 0
    Valid,
    /// Return code > 0: the document violates the schema
    Invalid {
        error_count: i32,
        errors: Vec<String>,
    },
    /// Return code < 0
    InternalError { code: i32 },
}

impl ValidationResult {
    pub fn from_code(code: c_int, errors: Vec<String>) -> Self {
        match code {
            0 => ValidationResult::Valid,
            n if n > 0 => ValidationResult::Invalid {
                error_count: n,
                errors,
            },
            n => ValidationResult::InternalError { code: n },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationResult::Invalid { .. })
    }
}

/// Entry point for libxml2 calls; constructing one initializes the library
#[derive(Debug)]
pub struct LibXml2Wrapper {
    _phantom: PhantomData<()>,
}

impl LibXml2Wrapper {
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| unsafe {
            xmlInitParser();
            xmlInitGlobals();
        });

        LibXml2Wrapper {
            _phantom: PhantomData,
        }
    }

    /// Parse an XML Schema held in memory
    pub fn parse_schema_from_memory(&self, schema_data: &[u8]) -> LibXml2Result<XmlSchemaPtr> {
        let size = c_int::try_from(schema_data.len()).map_err(|_| LibXml2Error::DocumentTooLarge {
            size: schema_data.len(),
        })?;
        let _guard = SCHEMA_PARSE_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        unsafe {
            let parser_ctxt =
                xmlSchemaNewMemParserCtxt(schema_data.as_ptr() as *const c_char, size);
            if parser_ctxt.is_null() {
                return Err(LibXml2Error::MemoryAllocation);
            }

            let schema_ptr = xmlSchemaParse(parser_ctxt);
            xmlSchemaFreeParserCtxt(parser_ctxt);

            XmlSchemaPtr::from_raw(schema_ptr)
        }
    }

    /// Parse `content` and validate it against `schema`
    ///
    /// `name` labels the document in libxml2 diagnostics. A document that is
    /// not well-formed yields [`LibXml2Error::DocumentParseFailed`]; schema
    /// violations come back as [`ValidationResult::Invalid`].
    pub fn validate_memory(
        &self,
        schema: &XmlSchemaPtr,
        content: &[u8],
        name: &str,
    ) -> LibXml2Result<ValidationResult> {
        let size = c_int::try_from(content.len()).map_err(|_| LibXml2Error::DocumentTooLarge {
            size: content.len(),
        })?;
        let c_name = CString::new(name).map_err(|_| LibXml2Error::DocumentParseFailed {
            name: name.to_string(),
        })?;

        unsafe {
            let doc = xmlReadMemory(
                content.as_ptr() as *const c_char,
                size,
                c_name.as_ptr(),
                std::ptr::null(),
                XML_PARSE_NONET,
            );
            if doc.is_null() {
                return Err(LibXml2Error::DocumentParseFailed {
                    name: name.to_string(),
                });
            }
            let doc = XmlDocGuard(doc);

            let valid_ctxt = xmlSchemaNewValidCtxt(schema.as_ptr());
            if valid_ctxt.is_null() {
                return Err(LibXml2Error::ValidationContextCreationFailed);
            }
            let valid_ctxt = ValidCtxtGuard(valid_ctxt);

            let mut errors: Vec<String> = Vec::new();
            xmlSchemaSetValidStructuredErrors(
                valid_ctxt.0,
                Some(collect_error),
                &mut errors as *mut Vec<String> as *mut c_void,
            );

            let code = xmlSchemaValidateDoc(valid_ctxt.0, doc.0);
            drop(valid_ctxt);

            match ValidationResult::from_code(code, errors) {
                ValidationResult::InternalError { code } => {
                    Err(LibXml2Error::InternalError { code })
                }
                result => Ok(result),
            }
        }
    }
}

impl Default for LibXml2Wrapper {
    fn default() -> Self {
        Self::new()
    }
}
