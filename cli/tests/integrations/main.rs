mod commands;
mod run;
