fn main() -> anyhow::Result<()> {
    let command_line_interface = jsonform::cli::CommandLineInterface::load();
    command_line_interface.run()
}
