//! Command-line driver for Midori-COFB.
//!
//! Reads whitespace-separated hex from stdin (or a file): a
//! 32-digit key, a nonce of up to 16 digits, then any number of
//! 16-digit plaintext blocks. Seals the blocks, then opens its
//! own output, printing each stage:
//!
//! ```text
//! K:    0123456789abcdeffedcba9876543210
//! N:    0123456789abcdef
//! C:    ac16f92b876226c5
//! T:    f08ef990009dcfc7
//! M:    aaaabbbbccccdddd
//! T_:   f08ef990009dcfc7
//! ```

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use midori64cofb::MidoriCofb;

/// Midori-COFB authenticated encryption driver.
#[derive(Parser)]
#[command(name = "cofbcli", version, about)]
struct Cli {
    /// Input file (defaults to stdin).
    input: Option<PathBuf>,
}

/// A tokenized input: key words, nonce, and payload blocks.
struct Input {
    k0: u64,
    k1: u64,
    nonce: u64,
    blocks: Vec<u64>,
}

fn main() -> ExitCode {
    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cofbcli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let input = parse_input(&text)?;

    println!("K:\t{:016x}{:016x}", input.k0, input.k1);
    println!("N:\t{:016x}", input.nonce);

    let aead = MidoriCofb::from_words(input.k0, input.k1);

    let (ciphertext, tag) = aead.seal(input.nonce, &input.blocks);
    print!("C:\t");
    for block in &ciphertext {
        print!("{block:016x}");
    }
    println!();
    println!("T:\t{tag:016x}");

    let (plaintext, computed) = aead.open(input.nonce, &ciphertext);
    print!("M:\t");
    for block in &plaintext {
        print!("{block:016x}");
    }
    println!();
    println!("T_:\t{computed:016x}");

    Ok(())
}

/// Tokenizes `text` into a key, nonce, and payload blocks.
fn parse_input(text: &str) -> Result<Input, Box<dyn Error>> {
    let mut tokens = text.split_whitespace();

    let key = tokens.next().ok_or("missing key")?;
    if key.len() != 32 {
        return Err(format!("key `{key}` must be 32 hex digits").into());
    }
    let k0 = u64::from_str_radix(&key[..16], 16)?;
    let k1 = u64::from_str_radix(&key[16..], 16)?;

    let nonce = tokens.next().ok_or("missing nonce")?;
    if nonce.len() > 16 {
        return Err(format!("nonce `{nonce}` must be at most 16 hex digits").into());
    }
    let nonce = u64::from_str_radix(nonce, 16)?;

    let blocks = tokens.map(parse_block).collect::<Result<_, _>>()?;

    Ok(Input {
        k0,
        k1,
        nonce,
        blocks,
    })
}

fn parse_block(token: &str) -> Result<u64, Box<dyn Error>> {
    if token.len() != 16 {
        return Err(format!("block `{token}` must be 16 hex digits").into());
    }
    Ok(u64::from_str_radix(token, 16)?)
}
