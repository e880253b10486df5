/*
 * This file is part of fanctl.
 *
 * Copyright (C) 2025 fanctl contributors
 *
 * fanctl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * fanctl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with fanctl. If not, see <https://www.gnu.org/licenses/>.
 */

use clap::Parser;
use fanctl::cli::{self, Cli};
use fanctl::logger;

fn main() {
    let cli_args = Cli::parse();
    logger::init_logging(cli_args.global.verbose);

    let stdout = std::io::stdout();
    if let Err(e) = cli::run_cli(&cli_args, &mut stdout.lock()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
