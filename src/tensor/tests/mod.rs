mod arithmetic;
mod index;
mod new;
mod others;
