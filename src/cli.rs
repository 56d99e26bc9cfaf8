use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wadlink")]
#[command(version)]
#[command(about = "A linker / unlinker for .wad asset containers", long_about = None)]
#[command(after_help = "Examples:\n  \
  wadlink -u mp_online.wad            unlink mp_online.wad into ./mp_online/\n  \
  wadlink -l mp_online                link ./mp_online/ into mp_online.wad\n  \
  wadlink -i mp_online.wad -v         show header and entry table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Unlink (extract) a .wad file
    #[command(short_flag = 'u', long_flag = "unlink")]
    Unlink(UnlinkArgs),

    /// Link (pack) a folder into a .wad file
    #[command(short_flag = 'l', long_flag = "link")]
    Link(LinkArgs),

    /// Show the header and entry table of a .wad file
    #[command(short_flag = 'i', long_flag = "info")]
    Info(InfoArgs),

    /// Display information about this tool
    #[command(short_flag = 'a', long_flag = "about")]
    About,
}

#[derive(Args, Debug)]
pub struct UnlinkArgs {
    /// Input .wad file
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Extract files into exdir (default: ./<file stem>)
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Payloads are zlib-wrapped instead of raw DEFLATE
    #[arg(long)]
    pub zlib: bool,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Folder whose files are packed
    #[arg(value_name = "FOLDER")]
    pub folder: String,

    /// Output file (default: ./<folder name>.wad)
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<String>,

    /// Value stored in the header's format version field
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub format_version: u32,

    /// Write zlib-wrapped payloads instead of raw DEFLATE
    #[arg(long)]
    pub zlib: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input .wad file
    #[arg(value_name = "FILE")]
    pub file: String,

    /// List entries verbosely
    #[arg(short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}

/// Whether `path` ends in `.wad`, ignoring case.
pub fn has_wad_extension(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(".wad")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_select_subcommands() {
        let cli = Cli::try_parse_from(["wadlink", "-u", "mp.wad", "-d", "out"]).unwrap();
        match cli.command {
            Command::Unlink(args) => {
                assert_eq!(args.file, "mp.wad");
                assert_eq!(args.extract_dir.as_deref(), Some("out"));
                assert!(!args.zlib);
            }
            other => panic!("unexpected {:?}", other),
        }

        let cli = Cli::try_parse_from(["wadlink", "--link", "mp", "--format-version", "1", "-q"])
            .unwrap();
        assert!(cli.is_quiet());
        assert!(!cli.is_very_quiet());
        match cli.command {
            Command::Link(args) => {
                assert_eq!(args.folder, "mp");
                assert_eq!(args.format_version, 1);
                assert_eq!(args.output, None);
            }
            other => panic!("unexpected {:?}", other),
        }

        let cli = Cli::try_parse_from(["wadlink", "-a"]).unwrap();
        assert!(matches!(cli.command, Command::About));
    }

    #[test]
    fn wad_extension_check() {
        assert!(has_wad_extension("mp_online.wad"));
        assert!(has_wad_extension("MP_ONLINE.WAD"));
        assert!(!has_wad_extension("mp_online"));
        assert!(!has_wad_extension("mp_online.wad.bak"));
    }
}
