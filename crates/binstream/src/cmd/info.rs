use binstream_channel::{BinaryFile, FileMode};

use crate::cmd::InfoArgs;
use crate::exit::{channel_error, CliResult, SUCCESS};
use crate::output::{print_info, InfoOutput, OutputFormat};

pub fn run(args: InfoArgs, format: OutputFormat) -> CliResult<i32> {
    let file =
        BinaryFile::open(&args.path, FileMode::READ).map_err(|e| channel_error("open", e))?;
    let size = file.size().map_err(|e| channel_error("metadata", e))?;

    let out = InfoOutput {
        path: file.path().display().to_string(),
        size,
        mode: mode_names(file.mode()),
    };
    print_info(&out, format);
    Ok(SUCCESS)
}

fn mode_names(mode: FileMode) -> Vec<String> {
    mode.iter_names().map(|(name, _)| name.to_string()).collect()
}
