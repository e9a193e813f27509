use charcodec::{ConvertOptions, bom};
use charcodec_cli::{convert_file, detect_file, format_bom_hex};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect the encoding of a file.
    Detect {
        /// The input file to inspect
        #[arg(short, long)]
        input: String,
    },

    /// Convert a file between charsets.
    Convert {
        /// The input file to process
        #[arg(short, long)]
        input: String,
        /// The output file to write the results to
        #[arg(short, long)]
        output: String,
        /// Target charset name
        #[arg(short, long)]
        to: String,
        /// Source charset name; detected from the input when omitted
        #[arg(short, long)]
        from: Option<String>,
        /// Fail on malformed or unrepresentable sequences instead of dropping them
        #[arg(long)]
        strict: bool,
        /// Strip the source charset's byte-order mark from the input
        #[arg(long)]
        strip_bom: bool,
        /// Prepend the target charset's byte-order mark to the output
        #[arg(long)]
        add_bom: bool,
    },

    /// Print the byte-order mark of a charset.
    Bom {
        /// Charset name, e.g. UTF-16LE
        charset: String,
    },
}

fn main() {
    let args = Args::parse();

    match args.commands {
        Commands::Detect { input } => match detect_file(&input) {
            Ok(detection) => {
                println!(
                    "{} (bom: {})",
                    detection.charset,
                    if detection.bom { "yes" } else { "no" }
                );
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Convert {
            input,
            output,
            to,
            from,
            strict,
            strip_bom,
            add_bom,
        } => {
            let from = match from {
                Some(charset) => charset,
                None => match detect_file(&input) {
                    Ok(detection) => detection.charset,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                },
            };
            let options = ConvertOptions {
                strict,
                handle_from_bom: strip_bom,
                handle_to_bom: add_bom,
            };
            if let Err(e) = convert_file(&input, &output, &to, &from, &options) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Bom { charset } => {
            println!("{}", format_bom_hex(bom(&charset)));
        }
    }
}
