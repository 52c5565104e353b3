//! Simple command that prints one or '-n count' UUIDv4 strings, drawing from the batching pool
//! with '-p'

use std::{env, io, io::Write, process::ExitCode};

struct Options {
    count: usize,
    pooled: bool,
}

fn main() -> io::Result<ExitCode> {
    env_logger::init();

    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count] [-p]",
                    program.as_deref().unwrap_or("uuid4")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    if opts.pooled {
        uuid4_pool::enable_pool();
    }

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count {
        match uuid4_pool::uuid4() {
            Ok(uuid) => writeln!(buf, "{}", uuid)?,
            Err(err) => {
                buf.flush()?;
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut count = None;
    let mut pooled = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-p" => pooled = true,
            "-n" => {
                if count.is_some() {
                    return Err("option 'n' given more than once".to_owned());
                }
                let Some(n_arg) = args.next() else {
                    return Err("argument to option 'n' missing".to_owned());
                };
                let Ok(c) = n_arg.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", n_arg));
                };
                count.replace(c);
            }
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }
    Ok(Options {
        count: count.unwrap_or(1),
        pooled,
    })
}
