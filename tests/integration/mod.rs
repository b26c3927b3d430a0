/// Integration tests covering SQLite persistence, sync and the MCP server
mod basic_integration;
