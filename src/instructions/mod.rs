mod add;
mod clr;
mod halt;
mod mov;
mod sob;
mod unknown;
