mod arithmetic;
mod others;
