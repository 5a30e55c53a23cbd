#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

fn main() -> anyhow::Result<()> {
    netpol_reachability_runtime::Args::parse_and_run()
}
