fn main() -> Result<(), Box<dyn std::error::Error>> {
    chat_console::cli::main()
}
