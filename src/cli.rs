use indoc::indoc;
use std::process::exit;

/// What the driver should produce. Exactly one of `-a`, `-c`, `-E`,
/// `-S` selects it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `-E`: print the preprocessing-token stream.
    PreprocessOnly,
    /// `-a`: parse and dump the AST.
    DumpAst,
    /// `-S`: stop after emitting assembly.
    Assembly,
    /// `-c`: compile and assemble, do not link.
    Object,
}

#[derive(Clone, Debug)]
pub struct BuildOptions {
    pub mode: Mode,
    pub infile: String,
    pub output: Option<String>,
    pub include_paths: Vec<String>,
    /// `-D name[=def]`, in command-line order.
    pub defines: Vec<(String, Option<String>)>,
    /// `-U name`, in command-line order.
    pub undefines: Vec<String>,
    pub enable_all_warnings: bool,
    pub warnings_are_errors: bool,
    pub suppress_warnings: bool,
    pub dump_ast: bool,
    pub dump_stack: bool,
    pub dump_source: bool,
    pub optimization_level: u32,
    pub debug_info: bool,
    pub m64: bool,
}

pub struct Command {
    pub options: BuildOptions,
}

impl Command {
    pub fn parse_env_args() -> Result<Self, ()> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ()> {
        fn set_mode(mode: &mut Option<Mode>, new_mode: Mode) -> Result<(), ()> {
            if mode.is_some() && *mode != Some(new_mode) {
                eprintln!("error: only one of -a, -c, -E, -S may be specified");
                return Err(());
            }
            *mode = Some(new_mode);
            Ok(())
        }

        let mut mode = None;
        let mut infile = None;
        let mut output = None;
        let mut include_paths = Vec::new();
        let mut defines = Vec::new();
        let mut undefines = Vec::new();
        let mut enable_all_warnings = false;
        let mut warnings_are_errors = false;
        let mut suppress_warnings = false;
        let mut dump_ast = false;
        let mut dump_stack = false;
        let mut dump_source = true;
        let mut optimization_level = 0;
        let mut debug_info = false;
        let mut m64 = true;

        while let Some(option) = args.next() {
            if option == "-h" || option == "--help" {
                show_usage(0);
            } else if option == "-E" {
                set_mode(&mut mode, Mode::PreprocessOnly)?;
            } else if option == "-a" {
                set_mode(&mut mode, Mode::DumpAst)?;
            } else if option == "-S" {
                set_mode(&mut mode, Mode::Assembly)?;
            } else if option == "-c" {
                set_mode(&mut mode, Mode::Object)?;
            } else if let Some(rest) = flag_value(&option, "-I", &mut args) {
                include_paths.push(rest?);
            } else if let Some(rest) = flag_value(&option, "-D", &mut args) {
                let rest = rest?;
                match rest.split_once('=') {
                    Some((name, def)) => defines.push((name.to_string(), Some(def.to_string()))),
                    None => defines.push((rest, None)),
                }
            } else if let Some(rest) = flag_value(&option, "-U", &mut args) {
                undefines.push(rest?);
            } else if let Some(rest) = flag_value(&option, "-o", &mut args) {
                output = Some(rest?);
            } else if let Some(rest) = option.strip_prefix("-W") {
                match rest {
                    "all" => enable_all_warnings = true,
                    "error" => warnings_are_errors = true,
                    _ => {
                        eprintln!("error: unknown -W option: {rest}");
                        return Err(());
                    }
                }
            } else if option == "-w" {
                suppress_warnings = true;
            } else if let Some(rest) = option.strip_prefix("-f") {
                match rest {
                    "dump-ast" => dump_ast = true,
                    "dump-stack" => dump_stack = true,
                    "no-dump-source" => dump_source = false,
                    _ => show_usage(1),
                }
            } else if let Some(rest) = option.strip_prefix("-O") {
                // Accepted for compatibility; optimization does
                // nothing at this moment.
                optimization_level = rest.parse().unwrap_or(0);
            } else if option == "-g" {
                debug_info = true;
            } else if let Some(rest) = option.strip_prefix("-m") {
                if rest != "64" {
                    eprintln!("error: only 64 is allowed for -m, but got {rest}");
                    return Err(());
                }
                m64 = true;
            } else if option.starts_with('-') && option.len() > 1 {
                eprintln!("error: unknown option: {option}");
                show_usage(1);
            } else if infile.is_some() {
                eprintln!("error: only one input file may be specified");
                return Err(());
            } else {
                infile = Some(option);
            }
        }

        let Some(mode) = mode else {
            eprintln!("error: one of -a, -c, -E or -S must be specified");
            return Err(());
        };
        let Some(infile) = infile else {
            eprintln!("error: no input file");
            return Err(());
        };

        Ok(Self {
            options: BuildOptions {
                mode,
                infile,
                output,
                include_paths,
                defines,
                undefines,
                enable_all_warnings,
                warnings_are_errors,
                suppress_warnings,
                dump_ast,
                dump_stack,
                dump_source,
                optimization_level,
                debug_info,
                m64,
            },
        })
    }
}

/// Handles both `-D name` and `-Dname` spellings, getopt style.
fn flag_value(
    option: &str,
    flag: &str,
    args: &mut impl Iterator<Item = String>,
) -> Option<Result<String, ()>> {
    let rest = option.strip_prefix(flag)?;
    if !rest.is_empty() {
        return Some(Ok(rest.to_string()));
    }
    match args.next() {
        Some(value) => Some(Ok(value)),
        None => {
            eprintln!("error: {flag} requires an argument");
            Some(Err(()))
        }
    }
}

fn show_usage(exitcode: i32) -> ! {
    let usage = indoc! {"
        Usage: occ [ -E ][ -a ] [ -h ] <file>

          -I<path>          add to include path
          -E                print preprocessed source code
          -D name           Predefine name as a macro
          -D name=def
          -S                Stop before assembly (default)
          -c                Do not run linker (default)
          -U name           Undefine name
          -fdump-ast        print AST
          -fdump-stack      Print stacktrace
          -fno-dump-source  Do not emit source code as assembly comment
          -o filename       Output to the specified file
          -g                Do nothing at this moment
          -Wall             Enable all warnings
          -Werror           Make all warnings into errors
          -O<number>        Does nothing at this moment
          -m64              Output 64-bit code (default)
          -w                Disable all warnings
          -h                print this help

        One of -a, -c, -E or -S must be specified.
    "};
    if exitcode == 0 {
        println!("{usage}");
    } else {
        eprintln!("{usage}");
    }
    exit(exitcode);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> BuildOptions {
        Command::parse(args.iter().map(|s| s.to_string()))
            .expect("arguments to parse")
            .options
    }

    #[test]
    fn preprocess_mode_with_defines() {
        let options = parse(&["-E", "-DFOO=1", "-D", "BAR", "-UBAZ", "-Iinclude", "main.c"]);
        assert_eq!(options.mode, Mode::PreprocessOnly);
        assert_eq!(options.infile, "main.c");
        assert_eq!(
            options.defines,
            vec![
                ("FOO".to_string(), Some("1".to_string())),
                ("BAR".to_string(), None),
            ]
        );
        assert_eq!(options.undefines, vec!["BAZ".to_string()]);
        assert_eq!(options.include_paths, vec!["include".to_string()]);
    }

    #[test]
    fn warning_flags() {
        let options = parse(&["-E", "-Werror", "-Wall", "main.c"]);
        assert!(options.warnings_are_errors);
        assert!(options.enable_all_warnings);

        let options = parse(&["-E", "-w", "main.c"]);
        assert!(options.suppress_warnings);
    }

    #[test]
    fn mode_is_required() {
        assert!(Command::parse(["main.c".to_string()].into_iter()).is_err());
    }

    #[test]
    fn conflicting_modes_are_rejected() {
        let args = ["-E".to_string(), "-S".to_string(), "main.c".to_string()];
        assert!(Command::parse(args.into_iter()).is_err());
    }

    #[test]
    fn stdin_is_a_valid_input_name() {
        let options = parse(&["-E", "-"]);
        assert_eq!(options.infile, "-");
    }
}
