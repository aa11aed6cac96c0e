use std::ffi::OsString;

use clap::{CommandFactory, Parser};

/// Launch flags. Anything else on the command line is ignored, since OS
/// launchers and the autostart entry may add their own arguments at any
/// position (macOS puts `-psn_*` first).
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "pocketcasts")]
#[command(about = "Pocket Casts web player with media key support")]
#[command(version)]
#[command(args_override_self = true)]
pub struct LaunchArgs {
    /// Start with the window minimized
    #[arg(long)]
    pub minimize: bool,
}

impl LaunchArgs {
    pub fn from_env() -> Self {
        Self::parse_lenient(std::env::args_os())
    }

    pub fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut args = args.into_iter().map(Into::<OsString>::into);
        let program = args.next().unwrap_or_else(|| OsString::from("pocketcasts"));
        let known = known_flags();

        // clap stops matching at the first token it does not know, so drop
        // everything that is not one of our flags before parsing
        let recognized = args.filter(|arg| {
            arg.to_str()
                .is_some_and(|arg| known.iter().any(|flag| flag == arg))
        });

        match Self::try_parse_from(std::iter::once(program).chain(recognized)) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("[CLI] Ignoring unparseable launch arguments: {}", e);
                Self::default()
            }
        }
    }
}

/// `--long` spellings of every declared launch flag
fn known_flags() -> Vec<String> {
    LaunchArgs::command()
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .map(|long| format!("--{}", long))
        .collect()
}
