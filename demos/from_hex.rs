fn main() {
    // Worked example from EN 13757-4 when no message is given
    let messages: Vec<String> = match std::env::args().skip(1).collect::<Vec<_>>() {
        args if args.is_empty() => vec![String::from("1444AE0C7856341201078C2027780B13436587")],
        args => args,
    };

    for message in messages {
        match wmbus_crc::crc16_hex(&message) {
            Ok(crc) => println!("{message} -> {crc}"),
            Err(e) => eprintln!("{message}: {e}"),
        }
    }
}
