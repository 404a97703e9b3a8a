use occ::buffer::Buffer;
use occ::cli::{BuildOptions, Command, Mode};
use occ::diagnostics::{DiagnosticFlags, Diagnostics};
use occ::lexer::stream::Stream;
use occ::lexer::Lexer;
use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::process::exit;

fn main() {
    let command = match Command::parse_env_args() {
        Ok(command) => command,
        Err(()) => exit(1),
    };
    let options = command.options;

    let flags = DiagnosticFlags {
        print_without_collecting: true,
        warnings_are_errors: options.warnings_are_errors,
        suppress_warnings: options.suppress_warnings,
    };
    let mut lexer = Lexer::new(Diagnostics::new(flags));
    exit_unless(lexer.lex_init(&options.infile));

    // Command-line macro definitions become ordinary source read ahead
    // of the input file, for the preprocessor to interpret.
    let cppdefs = predefined_macro_source(&options);
    if !cppdefs.is_empty() {
        lexer.stream_push(Stream::from_string(cppdefs.into_bytes()));
    }

    match options.mode {
        Mode::PreprocessOnly => {
            let mut out = open_output(options.output.as_deref());
            if let Err(error) = preprocess(&mut lexer, &mut *out) {
                eprintln!("error: cannot write output: {error}");
                exit(1);
            }
        }
        Mode::DumpAst | Mode::Assembly | Mode::Object => {
            eprintln!(
                "error: compilation past preprocessing is not available in this build; use -E"
            );
            exit(1);
        }
    }
}

fn exit_unless<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    }
}

/// Renders `-D` and `-U` options as `#define`/`#undef` lines.
fn predefined_macro_source(options: &BuildOptions) -> Buffer {
    let mut cppdefs = Buffer::new();
    for (name, def) in &options.defines {
        match def {
            Some(def) => cppdefs.printf(format_args!("#define {name} {def}\n")),
            None => cppdefs.printf(format_args!("#define {name}\n")),
        }
    }
    for name in &options.undefines {
        cppdefs.printf(format_args!("#undef {name}\n"));
    }
    cppdefs
}

fn open_output(output: Option<&str>) -> Box<dyn Write> {
    match output {
        None | Some("-") => Box::new(io::stdout()),
        Some(path) => match fs::File::create(path) {
            Ok(file) => Box::new(file),
            Err(error) => {
                eprintln!("error: cannot open {path}: {error}");
                exit(1);
            }
        },
    }
}

/// `-E`: prints the token stream, reconstructing line breaks and
/// spacing from the `bol` and `space` flags.
fn preprocess(lexer: &mut Lexer, out: &mut dyn Write) -> io::Result<()> {
    loop {
        let token = exit_unless(lexer.lex());
        if token.kind.is_eof() {
            break;
        }
        if token.kind.is_newline() {
            continue;
        }
        if token.bol {
            writeln!(out)?;
        }
        if token.space {
            write!(out, " ")?;
        }
        write!(out, "{token}")?;
    }
    writeln!(out)
}
