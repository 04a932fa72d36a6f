//! C++ code emission.
//!
//! [`CodeEmitter`] is the [`ResourceVisitor`] that turns a walk into two
//! source files: an interface (header) with one `extern` declaration per
//! file, and an implementation with the matching definitions. Both files
//! open the same top-level namespace and nest one namespace per directory,
//! so every declaration has its definition at the same position in the
//! other file.
//!
//! A file `icons/16x16/open.png` holding `89 50 4E 47` becomes
//!
//! ```text
//! // header
//! namespace icons {
//!     namespace _16x16 {
//!         extern const std::array<uint8_t, 4> open_png;
//!     }
//! }
//!
//! // implementation
//! namespace icons {
//!     namespace _16x16 {
//!         extern const std::array<uint8_t, 4> open_png = {
//!             137,80,78,71,
//!         };
//!     }
//! }
//! ```
//!
//! inside the configured top-level namespace.

use crate::chunk::{write_decimal_chunk, ByteChunks, CHUNK_SIZE};
use crate::error::{Error, Result};
use crate::walker::ResourceVisitor;
use std::io::Write;
use std::path::PathBuf;

/// Formatting options for generated code
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Top-level namespace wrapping everything (may contain `::`)
    pub namespace: String,
    /// Indentation string per nesting level (default: 4 spaces)
    pub indent_str: String,
    /// Maximum bytes per initializer line
    pub chunk_size: usize,
    /// Name of the generating tool, shown in the warning comment
    pub generator_name: String,
    /// How the implementation file includes the header
    pub include_name: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            namespace: "bricksim::resources".to_string(),
            indent_str: "    ".to_string(),
            chunk_size: CHUNK_SIZE,
            generator_name: "resbake".to_string(),
            include_name: "resources.h".to_string(),
        }
    }
}

impl EmitterConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-level namespace
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets the maximum bytes per initializer line
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets the generator name shown in the warning comment
    pub fn generator_name(mut self, name: impl Into<String>) -> Self {
        self.generator_name = name.into();
        self
    }

    /// Sets the header name used by the `#include` line
    pub fn include_name(mut self, name: impl Into<String>) -> Self {
        self.include_name = name.into();
        self
    }

    fn warning(&self) -> String {
        format!(
            "//this file is automatically generated by {}, editing it is a bad idea",
            self.generator_name
        )
    }
}

/// One output file: a writer plus the path reported in errors
#[derive(Debug)]
pub struct Stream<W> {
    path: PathBuf,
    inner: W,
}

impl<W: Write> Stream<W> {
    /// Wraps a writer; `path` is only used for diagnostics
    pub fn new(path: impl Into<PathBuf>, inner: W) -> Self {
        Self {
            path: path.into(),
            inner,
        }
    }

    fn line(&mut self, indent: &str, level: usize, text: &str) -> Result<()> {
        write_line(&mut self.inner, indent, level, text)
            .map_err(|e| Error::file_write(&self.path, e))
    }

    fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| Error::file_write(&self.path, e))
    }

    /// Unwraps the writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn write_line(w: &mut impl Write, indent: &str, level: usize, text: &str) -> std::io::Result<()> {
    for _ in 0..level {
        w.write_all(indent.as_bytes())?;
    }
    w.write_all(text.as_bytes())?;
    w.write_all(b"\n")
}

/// Writes the header and implementation streams in lockstep
#[derive(Debug)]
pub struct CodeEmitter<H, S> {
    header: Stream<H>,
    source: Stream<S>,
    config: EmitterConfig,
}

impl<H: Write, S: Write> CodeEmitter<H, S> {
    /// Creates an emitter and writes the opening boilerplate of both files
    pub fn begin(header: Stream<H>, source: Stream<S>, config: EmitterConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(Error::InvalidChunkSize(0));
        }

        let mut emitter = Self {
            header,
            source,
            config,
        };

        let warning = emitter.config.warning();
        let open_ns = format!("namespace {} {{", emitter.config.namespace);

        emitter.header.line("", 0, &warning)?;
        emitter.header.line("", 0, "#include <array>")?;
        emitter.header.line("", 0, "#include <cstdint>")?;
        emitter.header.line("", 0, &open_ns)?;

        emitter.source.line("", 0, &warning)?;
        let include = format!("#include \"{}\"", emitter.config.include_name);
        emitter.source.line("", 0, &include)?;
        emitter.source.line("", 0, "//@formatter:off")?;
        emitter.source.line("", 0, "// clang-format off")?;
        emitter.source.line("", 0, &open_ns)?;

        Ok(emitter)
    }

    /// Writes the closing boilerplate, flushes both files and hands back
    /// the writers
    pub fn finish(mut self) -> Result<(H, S)> {
        self.header.line("", 0, "}")?;

        self.source.line("", 0, "}")?;
        self.source.line("", 0, "// clang-format on")?;
        self.source.line("", 0, "//@formatter:on")?;

        self.header.flush()?;
        self.source.flush()?;

        Ok((self.header.into_inner(), self.source.into_inner()))
    }

    /// Walk depth 0 sits one level inside the top-level namespace
    fn level(depth: usize) -> usize {
        depth + 1
    }
}

impl<H: Write, S: Write> ResourceVisitor for CodeEmitter<H, S> {
    fn enter_scope(&mut self, ident: &str, depth: usize) -> Result<()> {
        let decl = format!("namespace {} {{", ident);
        let indent = &self.config.indent_str;
        self.header.line(indent, Self::level(depth), &decl)?;
        self.source.line(indent, Self::level(depth), &decl)
    }

    fn leave_scope(&mut self, _ident: &str, depth: usize) -> Result<()> {
        let indent = &self.config.indent_str;
        self.header.line(indent, Self::level(depth), "}")?;
        self.source.line(indent, Self::level(depth), "}")
    }

    fn visit_file(&mut self, ident: &str, data: &[u8], depth: usize) -> Result<()> {
        let level = Self::level(depth);
        let indent = &self.config.indent_str;
        let declaration = format!(
            "extern const std::array<uint8_t, {}> {}",
            data.len(),
            ident
        );

        self.header.line(indent, level, &format!("{};", declaration))?;

        self.source.line(indent, level, &format!("{} = {{", declaration))?;
        let mut buf = String::new();
        for chunk in ByteChunks::new(data, self.config.chunk_size) {
            buf.clear();
            write_decimal_chunk(&mut buf, chunk);
            self.source.line(indent, level + 1, &buf)?;
        }
        self.source.line(indent, level, "};")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emitter(config: EmitterConfig) -> CodeEmitter<Vec<u8>, Vec<u8>> {
        CodeEmitter::begin(
            Stream::new("resources.h", Vec::new()),
            Stream::new("resources.cpp", Vec::new()),
            config,
        )
        .unwrap()
    }

    fn finish(emitter: CodeEmitter<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (h, s) = emitter.finish().unwrap();
        (String::from_utf8(h).unwrap(), String::from_utf8(s).unwrap())
    }

    #[test]
    fn test_empty_run_framing() {
        let (header, source) = finish(emitter(EmitterConfig::new()));

        assert_eq!(
            header,
            "//this file is automatically generated by resbake, editing it is a bad idea\n\
             #include <array>\n\
             #include <cstdint>\n\
             namespace bricksim::resources {\n\
             }\n"
        );
        assert_eq!(
            source,
            "//this file is automatically generated by resbake, editing it is a bad idea\n\
             #include \"resources.h\"\n\
             //@formatter:off\n\
             // clang-format off\n\
             namespace bricksim::resources {\n\
             }\n\
             // clang-format on\n\
             //@formatter:on\n"
        );
    }

    #[test]
    fn test_nested_file() {
        let mut e = emitter(EmitterConfig::new().namespace("res"));
        e.enter_scope("icons", 0).unwrap();
        e.visit_file("open_png", &[0x89, 0x50, 0x4E, 0x47], 1).unwrap();
        e.leave_scope("icons", 0).unwrap();
        let (header, source) = finish(e);

        assert!(header.contains(
            "namespace res {\n    namespace icons {\n        extern const std::array<uint8_t, 4> open_png;\n    }\n}\n"
        ));
        assert!(source.contains(
            "    namespace icons {\n        extern const std::array<uint8_t, 4> open_png = {\n            137,80,78,71,\n        };\n    }\n"
        ));
    }

    #[test]
    fn test_empty_file_has_empty_body() {
        let mut e = emitter(EmitterConfig::new());
        e.visit_file("empty_bin", &[], 0).unwrap();
        let (header, source) = finish(e);

        assert!(header.contains("    extern const std::array<uint8_t, 0> empty_bin;\n"));
        assert!(source.contains("    extern const std::array<uint8_t, 0> empty_bin = {\n    };\n"));
    }

    #[test]
    fn test_chunked_lines() {
        let mut e = emitter(EmitterConfig::new().chunk_size(2).indent_str("\t"));
        e.visit_file("five", &[1, 2, 3, 4, 5], 0).unwrap();
        let (_, source) = finish(e);

        assert!(source.contains("\textern const std::array<uint8_t, 5> five = {\n\t\t1,2,\n\t\t3,4,\n\t\t5,\n\t};\n"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = CodeEmitter::begin(
            Stream::new("h", Vec::new()),
            Stream::new("s", Vec::new()),
            EmitterConfig::new().chunk_size(0),
        );
        assert!(matches!(result, Err(Error::InvalidChunkSize(0))));
    }

    #[test]
    fn test_write_error_names_file() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let result = CodeEmitter::begin(
            Stream::new("out/resources.h", Broken),
            Stream::new("out/resources.cpp", Vec::new()),
            EmitterConfig::new(),
        );
        match result {
            Err(Error::FileWrite { path, .. }) => assert_eq!(path, PathBuf::from("out/resources.h")),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
